pub mod analyze;
pub mod beams;
pub mod junction;
pub mod place_fields;
pub mod placement;

pub use place_fields::{
    JunctionRecord, PlaceFields, PlacedGroup, PlacementReport, PlacementRequest,
};
