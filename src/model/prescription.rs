/// Read-only prescription tuple supplied by the host planning system.
///
/// The kernel never interprets dose values; they are passed back to the host
/// when plans are created.
#[derive(Debug, Clone, PartialEq)]
pub struct Prescription {
    pub plan_id: String,
    pub target_id: String,
    pub fraction_count: u32,
    /// Dose per fraction in the host's dose unit.
    pub dose_per_fraction: f64,
    pub cumulative_dose: f64,
}

impl Prescription {
    /// Creates a new prescription.
    #[must_use]
    pub fn new(
        plan_id: impl Into<String>,
        target_id: impl Into<String>,
        fraction_count: u32,
        dose_per_fraction: f64,
        cumulative_dose: f64,
    ) -> Self {
        Self {
            plan_id: plan_id.into(),
            target_id: target_id.into(),
            fraction_count,
            dose_per_fraction,
            cumulative_dose,
        }
    }
}
