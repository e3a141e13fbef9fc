mod arc_fields;
mod static_fields;

pub use arc_fields::{validate_templates, ArcFieldAssignment};
pub use static_fields::StaticFieldAssignment;
