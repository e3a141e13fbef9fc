use thiserror::Error;

/// Top-level error type for the Isolis placement kernel.
#[derive(Debug, Error)]
pub enum IsolisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Junction(#[from] JunctionError),

    #[error(transparent)]
    Host(#[from] HostFailure),
}

/// Input preconditions violated before any host state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("structure not found: {0}")]
    MissingStructure(String),

    #[error("structure {0} has no mesh geometry")]
    EmptyGeometry(String),

    #[error("no prescription supplied")]
    MissingPrescription,

    #[error("{labels} isocenter labels supplied for {beam_counts} beam counts")]
    BeamCountMismatch { labels: usize, beam_counts: usize },

    #[error("field group has no isocenters")]
    EmptyFieldGroup,

    #[error("beam slot {slot} exceeds the supplied template list ({available} entries)")]
    TemplateIndexOutOfRange { slot: usize, available: usize },

    #[error("plan already exists: {0}")]
    PlanExists(String),
}

/// A policy decision point was declined by the operator.
///
/// This is a user-initiated abort, distinct from a computational failure.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error(
        "isocenter separation {separation} exceeds the {cap} cap and truncation was not confirmed"
    )]
    SeparationNotConfirmed { separation: f64, cap: f64 },
}

/// Geometric infeasibility in the junction overlap computation.
#[derive(Debug, Error)]
pub enum JunctionError {
    #[error(
        "junction overlap is infeasible: field length {field_length}, overlap margin {margin}, \
         isocenter separation {separation}"
    )]
    InfeasibleOverlap {
        field_length: f64,
        margin: f64,
        separation: f64,
    },
}

/// Errors raised by the host geometry/plan service.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("plan handle is stale")]
    PlanNotFound,

    #[error("structure handle is stale")]
    StructureNotFound,

    #[error("{0}")]
    Rejected(String),
}

/// A host call failed; records which pipeline step was executing.
///
/// No partial-state rollback is attempted — cleanup of host objects created
/// before the failure is the caller's responsibility.
#[derive(Debug, Error)]
#[error("host service failed during {step}: {source}")]
pub struct HostFailure {
    pub step: &'static str,
    #[source]
    pub source: HostError,
}

/// Convenience type alias for results using [`IsolisError`].
pub type Result<T> = std::result::Result<T, IsolisError>;
