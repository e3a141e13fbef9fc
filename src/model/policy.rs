/// Numeric policy constants for placement. All lengths are in the host's
/// length unit (1 unit = 1 mm in clinical deployments).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementPolicy {
    /// Maximum longitudinal coverage of a single field.
    pub field_coverage: f64,
    /// Minimum required overlap between adjacent fields.
    pub min_overlap: f64,
    /// Pull-in from the extent ends when seeding the outermost isocenters.
    pub edge_margin: f64,
    /// Warn when a field edge clears the target extreme by less than this.
    pub coverage_margin_limit: f64,
    /// Below this boundary-to-extent distance the trailing static pair
    /// becomes a half-field block.
    pub half_block_threshold: f64,
}

impl PlacementPolicy {
    /// Largest isocenter separation allowed without operator confirmation.
    ///
    /// Anything wider would thin the inter-field overlap below the minimum.
    #[must_use]
    pub fn separation_cap(&self) -> f64 {
        self.field_coverage - self.min_overlap
    }
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            field_coverage: 400.0,
            min_overlap: 20.0,
            edge_margin: 10.0,
            coverage_margin_limit: 5.0,
            half_block_threshold: 600.0,
        }
    }
}
