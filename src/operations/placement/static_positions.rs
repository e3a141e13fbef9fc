use tracing::debug;

use crate::host::FrameConverter;
use crate::math::Point3;
use crate::model::{IsoSlot, IsocenterSpec};

use super::snap_in_user_frame;

/// Generates the isocenter positions for the trailing static field group,
/// counting down from the matchline boundary.
///
/// The first position sits the same distance below the boundary as the last
/// rotating isocenter ended up above it after grid snapping, keeping the two
/// isocenters flanking the matchline equidistant from it.
pub struct StaticIsoPositions<'a> {
    /// Superior bound of the group (the matchline center).
    boundary_z: f64,
    separation: f64,
    /// Final position of the last rotating isocenter.
    last_arc_z: f64,
    slots: &'a [IsoSlot],
    lateral: Point3,
}

impl<'a> StaticIsoPositions<'a> {
    /// Creates a new `StaticIsoPositions` generator.
    #[must_use]
    pub fn new(
        boundary_z: f64,
        separation: f64,
        last_arc_z: f64,
        slots: &'a [IsoSlot],
        lateral: Point3,
    ) -> Self {
        Self {
            boundary_z,
            separation,
            last_arc_z,
            slots,
            lateral,
        }
    }

    /// Executes the generation, snapping each position to the coarse grid in
    /// the user frame.
    #[must_use]
    pub fn execute(&self, frame: &dyn FrameConverter) -> Vec<IsocenterSpec> {
        let offset = self.last_arc_z - self.boundary_z;
        let mut isocenters = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let steps = i as f64;
            let z = self.boundary_z - steps * self.separation - offset;
            let raw = Point3::new(self.lateral.x, self.lateral.y, z);
            let position = snap_in_user_frame(&raw, frame);
            debug!(label = %slot.label, z = position.z, "placed static isocenter");
            isocenters.push(IsocenterSpec::new(position, slot.label.clone(), slot.beam_count));
        }
        isocenters
    }
}
