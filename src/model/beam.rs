use crate::math::Point3;

/// Number of leaf pairs in the multi-leaf collimator model.
pub const LEAF_PAIRS: usize = 60;

/// Rectangular jaw aperture at the isocenter plane.
///
/// x1/y1 are the negative-side jaw edges, x2/y2 the positive side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JawRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl JawRect {
    /// Creates a new jaw rectangle.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Full-height aperture (y jaws wide open) with the given x jaw edges.
    #[must_use]
    pub fn full_height(x1: f64, x2: f64) -> Self {
        Self::new(x1, -200.0, x2, 200.0)
    }
}

/// Gantry rotation sense for a beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GantryDirection {
    /// Static beam; the gantry does not move during delivery.
    None,
    Clockwise,
    CounterClockwise,
}

impl GantryDirection {
    /// Short tag used in beam identifiers.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Clockwise => "CW",
            Self::CounterClockwise => "CCW",
        }
    }
}

/// Delivery technique of a beam set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    Arc,
    Static,
}

/// Machine configuration shared by the beams of a field group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineParameters {
    pub machine_id: String,
    pub energy: String,
    /// Dose rate in monitor units per minute.
    pub dose_rate: u32,
    pub technique: Technique,
}

impl MachineParameters {
    /// Parameters for the rotating field group.
    #[must_use]
    pub fn arc(machine_id: impl Into<String>, energy: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            energy: energy.into(),
            dose_rate: 600,
            technique: Technique::Arc,
        }
    }

    /// Parameters for the static opposed pairs. These always use the
    /// low-energy beam regardless of the arc energy.
    #[must_use]
    pub fn static_fields(machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            energy: "6X".into(),
            dose_rate: 600,
            technique: Technique::Static,
        }
    }
}

/// Multi-leaf collimator positions: bank 0 backs the X1 jaw, bank 1 the X2
/// jaw, one entry per leaf pair.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafPositions {
    pub bank_x1: [f64; LEAF_PAIRS],
    pub bank_x2: [f64; LEAF_PAIRS],
}

impl LeafPositions {
    /// Both banks flat at the jaw edges, forming a rectangular field.
    #[must_use]
    pub fn flat(x1: f64, x2: f64) -> Self {
        Self {
            bank_x1: [x1; LEAF_PAIRS],
            bank_x2: [x2; LEAF_PAIRS],
        }
    }
}

/// A fully specified treatment beam. Produced once per beam slot; immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSpec {
    pub jaws: JawRect,
    /// Collimator rotation in degrees.
    pub collimator: f64,
    pub direction: GantryDirection,
    pub gantry_start: f64,
    pub gantry_stop: f64,
    pub isocenter: Point3,
    /// Human-readable beam identifier.
    pub label: String,
    /// Leaf bank positions; only static fields shape their apertures with
    /// the MLC here.
    pub leaves: Option<LeafPositions>,
}
