mod coverage;
mod extent;

pub use coverage::{CoverageCheck, CoverageReport};
pub use extent::ExtentAnalysis;
