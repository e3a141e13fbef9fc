use tracing::warn;

use crate::model::{Extent, PlacementPolicy};

/// Result of the post-placement coverage check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageReport {
    /// Clearance between the first field's superior edge and the target's
    /// superior extreme.
    pub superior_margin: f64,
    /// Clearance between the last field's inferior edge and the target's
    /// inferior extreme.
    pub inferior_margin: f64,
    /// True when either margin is below the configured limit.
    pub insufficient: bool,
    pub limit: f64,
}

/// Flags insufficient clearance between the outermost isocenters' field edges
/// and the target's extreme extents.
///
/// Non-fatal: placement proceeds regardless, the flag is surfaced to the
/// operator for verification.
pub struct CoverageCheck<'a> {
    first_iso_z: f64,
    last_iso_z: f64,
    extent: Extent,
    policy: &'a PlacementPolicy,
}

impl<'a> CoverageCheck<'a> {
    /// Creates a new `CoverageCheck` over the composite of all field groups:
    /// the first isocenter of the first group and the last isocenter of the
    /// last group.
    #[must_use]
    pub fn new(
        first_iso_z: f64,
        last_iso_z: f64,
        extent: Extent,
        policy: &'a PlacementPolicy,
    ) -> Self {
        Self {
            first_iso_z,
            last_iso_z,
            extent,
            policy,
        }
    }

    /// Executes the check.
    #[must_use]
    pub fn execute(&self) -> CoverageReport {
        let half_field = self.policy.field_coverage / 2.0;
        let superior_margin = (self.first_iso_z + half_field) - self.extent.superior_z;
        let inferior_margin = self.extent.inferior_z - (self.last_iso_z - half_field);
        let limit = self.policy.coverage_margin_limit;
        let insufficient = superior_margin < limit || inferior_margin < limit;
        if insufficient {
            warn!(
                superior_margin,
                inferior_margin, limit, "field edges leave less than the margin limit at the target extremes"
            );
        }
        CoverageReport {
            superior_margin,
            inferior_margin,
            insufficient,
            limit,
        }
    }
}
