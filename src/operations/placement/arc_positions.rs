use tracing::debug;

use crate::host::FrameConverter;
use crate::math::Point3;
use crate::model::{Extent, IsoSlot, IsocenterSpec, PlacementPolicy};

use super::snap_in_user_frame;

/// Generates the ordered isocenter positions for the rotating field group.
///
/// Positions count up from the inferior bound so the distance from a
/// matchline boundary to its adjacent isocenter stays fixed; the output is
/// ordered superior to inferior.
pub struct ArcIsoPositions<'a> {
    extent: Extent,
    separation: f64,
    slots: &'a [IsoSlot],
    /// Lateral seed for every isocenter (the user origin's x/y).
    lateral: Point3,
    policy: &'a PlacementPolicy,
}

impl<'a> ArcIsoPositions<'a> {
    /// Creates a new `ArcIsoPositions` generator.
    #[must_use]
    pub fn new(
        extent: Extent,
        separation: f64,
        slots: &'a [IsoSlot],
        lateral: Point3,
        policy: &'a PlacementPolicy,
    ) -> Self {
        Self {
            extent,
            separation,
            slots,
            lateral,
            policy,
        }
    }

    /// Executes the generation, snapping each position to the coarse grid in
    /// the user frame.
    #[must_use]
    pub fn execute(&self, frame: &dyn FrameConverter) -> Vec<IsocenterSpec> {
        let count = self.slots.len();
        let edge_offset = self.policy.field_coverage / 2.0 - self.policy.edge_margin;
        let mut isocenters = Vec::with_capacity(count);
        for (i, slot) in self.slots.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let steps = (count - i - 1) as f64;
            let z = self.extent.inferior_z + steps * self.separation + edge_offset;
            let raw = Point3::new(self.lateral.x, self.lateral.y, z);
            let position = snap_in_user_frame(&raw, frame);
            debug!(label = %slot.label, z = position.z, "placed arc isocenter");
            isocenters.push(IsocenterSpec::new(position, slot.label.clone(), slot.beam_count));
        }
        isocenters
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::host::UserFrame;
    use approx::assert_relative_eq;

    fn slots(labels: &[&str]) -> Vec<IsoSlot> {
        labels.iter().map(|&l| IsoSlot::new(l, 4)).collect()
    }

    #[test]
    fn positions_descend_superior_to_inferior() {
        let policy = PlacementPolicy::default();
        let slots = slots(&["Head", "Chest", "Pelvis"]);
        let isos = ArcIsoPositions::new(
            Extent::new(500.0, -500.0),
            310.0,
            &slots,
            Point3::origin(),
            &policy,
        )
        .execute(&UserFrame::identity());

        assert_eq!(isos.len(), 3);
        // z = -500 + steps * 310 + 190
        assert_relative_eq!(isos[0].position.z, 310.0);
        assert_relative_eq!(isos[1].position.z, 0.0);
        assert_relative_eq!(isos[2].position.z, -310.0);
        assert!(isos.windows(2).all(|w| w[0].position.z > w[1].position.z));
    }

    #[test]
    fn labels_and_beam_counts_follow_index() {
        let policy = PlacementPolicy::default();
        let slots = vec![IsoSlot::new("Head", 4), IsoSlot::new("Pelvis", 2)];
        let isos = ArcIsoPositions::new(
            Extent::new(300.0, -300.0),
            220.0,
            &slots,
            Point3::origin(),
            &policy,
        )
        .execute(&UserFrame::identity());
        assert_eq!(isos[0].label, "Head");
        assert_eq!(isos[0].beam_count, 4);
        assert_eq!(isos[1].label, "Pelvis");
        assert_eq!(isos[1].beam_count, 2);
    }

    #[test]
    fn lateral_coordinates_come_from_the_seed() {
        let policy = PlacementPolicy::default();
        let slots = slots(&["Head"]);
        let isos = ArcIsoPositions::new(
            Extent::new(200.0, -200.0),
            0.0,
            &slots,
            Point3::new(12.0, -27.0, 0.0),
            &policy,
        )
        .execute(&UserFrame::identity());
        assert_relative_eq!(isos[0].position.x, 10.0);
        assert_relative_eq!(isos[0].position.y, -30.0);
    }

    #[test]
    fn rounding_happens_in_the_user_frame() {
        let policy = PlacementPolicy::default();
        let slots = slots(&["Head"]);
        // Inferior -204 + 190 = -14; user frame shifted by 1 puts it at -15,
        // which rounds away to -20 and converts back to -19.
        let frame = UserFrame::new(Point3::new(0.0, 0.0, 1.0));
        let isos = ArcIsoPositions::new(
            Extent::new(200.0, -204.0),
            0.0,
            &slots,
            Point3::origin(),
            &policy,
        )
        .execute(&frame);
        assert_relative_eq!(isos[0].position.z, -19.0);
    }
}
