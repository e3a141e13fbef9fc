use tracing::debug;

use crate::math::Point3;
use crate::model::{
    BeamSpec, GantryDirection, IsocenterSpec, JawRect, LeafPositions, PlacementPolicy,
};

/// Deliverable range of the far-side jaw.
const FAR_JAW_MIN: f64 = 10.0;
const FAR_JAW_MAX: f64 = 200.0;
/// Near-side jaw when the field is wide open.
const FULL_OPEN: f64 = -200.0;
/// Near-side jaw for a half-field block.
const HALF_BLOCK: f64 = 0.0;
/// How far below the first static isocenter the trailing pair sits.
const TRAILING_DROP: f64 = 390.0;
/// The shortened drop when the trailing pair is half-blocked.
const TRAILING_DROP_HALF_BLOCK: f64 = 200.0;

/// Synthesizes the opposed static pairs for the trailing field group.
///
/// Each isocenter gets an anterior (gantry 0) and posterior (gantry 180)
/// field with the collimator at 90, so the x jaws run along the patient's
/// long axis. The far-side jaw is fitted to just cover the target's inferior
/// extreme; when the region below the matchline is short, the trailing pair
/// is half-blocked on the near side to keep it off the junction.
pub struct StaticFieldAssignment<'a> {
    isocenters: &'a [IsocenterSpec],
    /// Matchline center, the superior boundary of this group.
    boundary_z: f64,
    /// Margined inferior extent of the target.
    target_inferior_z: f64,
    policy: &'a PlacementPolicy,
}

impl<'a> StaticFieldAssignment<'a> {
    /// Creates a new `StaticFieldAssignment` operation.
    #[must_use]
    pub fn new(
        isocenters: &'a [IsocenterSpec],
        boundary_z: f64,
        target_inferior_z: f64,
        policy: &'a PlacementPolicy,
    ) -> Self {
        Self {
            isocenters,
            boundary_z,
            target_inferior_z,
            policy,
        }
    }

    /// Executes the synthesis. `beam_counter` continues the run's running
    /// beam numbering.
    #[must_use]
    pub fn execute(&self, beam_counter: &mut usize) -> Vec<BeamSpec> {
        let mut beams = Vec::new();
        let Some(first) = self.isocenters.first() else {
            return beams;
        };

        let x2 = self.far_jaw_fit(first.position.z);
        push_pair(&mut beams, beam_counter, first.position, &first.label, FULL_OPEN, x2);

        if let Some(trailing) = self.isocenters.get(1) {
            // When the region below the matchline is short, the trailing pair
            // moves up and is half-blocked so it cannot double-dose the
            // junction with the pair above it.
            let short_legs =
                self.boundary_z - self.target_inferior_z < self.policy.half_block_threshold;
            let (drop, x1) = if short_legs {
                (TRAILING_DROP_HALF_BLOCK, HALF_BLOCK)
            } else {
                (TRAILING_DROP, FULL_OPEN)
            };
            let position = Point3::new(
                first.position.x,
                first.position.y,
                first.position.z - drop,
            );
            let x2 = self.far_jaw_fit(position.z);
            debug!(z = position.z, x1, x2, "derived trailing static isocenter");
            push_pair(&mut beams, beam_counter, position, &trailing.label, x1, x2);
        }
        beams
    }

    /// Far-side jaw position that just covers the target's inferior extreme
    /// plus the minimum overlap clearance, clamped to the deliverable range.
    fn far_jaw_fit(&self, iso_z: f64) -> f64 {
        (iso_z - (self.target_inferior_z - self.policy.min_overlap))
            .clamp(FAR_JAW_MIN, FAR_JAW_MAX)
    }
}

/// Adds an opposed anterior/posterior pair at one isocenter.
fn push_pair(
    beams: &mut Vec<BeamSpec>,
    beam_counter: &mut usize,
    isocenter: Point3,
    label: &str,
    x1: f64,
    x2: f64,
) {
    for (gantry, side) in [(0.0, "AP"), (180.0, "PA")] {
        let beam_label = format!("{} {side} {label}", *beam_counter + 1);
        debug!(label = %beam_label, "assigned static beam");
        beams.push(BeamSpec {
            jaws: JawRect::full_height(x1, x2),
            collimator: 90.0,
            direction: GantryDirection::None,
            gantry_start: gantry,
            gantry_stop: gantry,
            isocenter,
            label: beam_label,
            leaves: Some(LeafPositions::flat(x1, x2)),
        });
        *beam_counter += 1;
    }
}
