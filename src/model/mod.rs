pub mod beam;
pub mod extent;
pub mod isocenter;
pub mod junction;
pub mod policy;
pub mod prescription;
pub mod tables;

pub use beam::{BeamSpec, GantryDirection, JawRect, LeafPositions, MachineParameters, Technique};
pub use extent::Extent;
pub use isocenter::{GroupKind, GroupSpec, IsoSlot, IsocenterSpec};
pub use junction::JunctionSpec;
pub use policy::PlacementPolicy;
pub use prescription::Prescription;
pub use tables::{
    ApertureSwap, ApertureSwapTable, BeamTemplate, CollimatorOverride, CollimatorOverrideTable,
    IsoRole,
};
