use super::beam::JawRect;

/// Per-slot beam template: collimator angle plus jaw aperture, indexed by the
/// beam's position within its isocenter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamTemplate {
    pub collimator: f64,
    pub aperture: JawRect,
}

impl BeamTemplate {
    /// Creates a new template entry.
    #[must_use]
    pub fn new(collimator: f64, aperture: JawRect) -> Self {
        Self {
            collimator,
            aperture,
        }
    }
}

/// The role an isocenter plays when the override tables are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoRole {
    /// An ordinary isocenter inside the group.
    Interior,
    /// The isocenter immediately superior to the matchline boundary.
    MatchlineAdjacent,
}

/// A forced collimator angle for one (role, slot) combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollimatorOverride {
    pub role: IsoRole,
    pub slot: usize,
    pub angle: f64,
}

/// Collimator angles that replace the per-slot template values for specific
/// isocenter roles.
///
/// Kept as data rather than branches so new anatomical configurations can be
/// added without touching the assignment algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct CollimatorOverrideTable {
    rows: Vec<CollimatorOverride>,
}

impl CollimatorOverrideTable {
    /// Creates a table from explicit rows.
    #[must_use]
    pub fn new(rows: Vec<CollimatorOverride>) -> Self {
        Self { rows }
    }

    /// The forced angle for this role and slot, if any.
    #[must_use]
    pub fn lookup(&self, role: IsoRole, slot: usize) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.role == role && row.slot == slot)
            .map(|row| row.angle)
    }
}

impl Default for CollimatorOverrideTable {
    /// The matchline-adjacent isocenter runs its two main fields with the
    /// collimator at 0 and its third field at 90; the fourth keeps its
    /// template value.
    fn default() -> Self {
        Self::new(vec![
            CollimatorOverride {
                role: IsoRole::MatchlineAdjacent,
                slot: 0,
                angle: 0.0,
            },
            CollimatorOverride {
                role: IsoRole::MatchlineAdjacent,
                slot: 1,
                angle: 0.0,
            },
            CollimatorOverride {
                role: IsoRole::MatchlineAdjacent,
                slot: 2,
                angle: 90.0,
            },
        ])
    }
}

/// An aperture substitution: one isocenter's beam slot draws its jaws from a
/// different template entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApertureSwap {
    /// Isocenter index within the group, 0-based from superior.
    pub isocenter: usize,
    pub slot: usize,
    /// Template entry to use instead of `slot`.
    pub use_slot: usize,
}

/// Aperture substitutions applied on top of the per-slot templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApertureSwapTable {
    rows: Vec<ApertureSwap>,
}

impl ApertureSwapTable {
    /// Creates a table from explicit rows.
    #[must_use]
    pub fn new(rows: Vec<ApertureSwap>) -> Self {
        Self { rows }
    }

    /// The template index this isocenter/slot combination should draw its
    /// aperture from.
    #[must_use]
    pub fn resolve(&self, isocenter: usize, slot: usize) -> usize {
        self.rows
            .iter()
            .find(|row| row.isocenter == isocenter && row.slot == slot)
            .map_or(slot, |row| row.use_slot)
    }
}

impl Default for ApertureSwapTable {
    /// The second isocenter's third and fourth beams trade apertures: the
    /// x jaws mirror about the y axis so the fields aim at the kidney region.
    fn default() -> Self {
        Self::new(vec![
            ApertureSwap {
                isocenter: 1,
                slot: 2,
                use_slot: 3,
            },
            ApertureSwap {
                isocenter: 1,
                slot: 3,
                use_slot: 2,
            },
        ])
    }
}
