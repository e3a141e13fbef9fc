use crate::error::ValidationError;
use crate::math::Point3;

/// Which delivery family a field group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Rotating (arc) beams; the primary group.
    Arc,
    /// Static opposed beams; the trailing group below the matchline.
    Static,
}

/// Caller-supplied specification for one isocenter slot: display label plus
/// the number of beams to place there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoSlot {
    pub label: String,
    pub beam_count: usize,
}

impl IsoSlot {
    /// Creates a new slot specification.
    #[must_use]
    pub fn new(label: impl Into<String>, beam_count: usize) -> Self {
        Self {
            label: label.into(),
            beam_count,
        }
    }
}

/// Caller specification for one field group as parallel label and beam-count
/// lists, the shape the planning templates store them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub labels: Vec<String>,
    pub beam_counts: Vec<usize>,
}

impl GroupSpec {
    /// Creates a new group specification.
    #[must_use]
    pub fn new(labels: Vec<String>, beam_counts: Vec<usize>) -> Self {
        Self {
            labels,
            beam_counts,
        }
    }

    /// Zips the parallel lists into per-isocenter slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the list lengths differ.
    pub fn slots(&self) -> Result<Vec<IsoSlot>, ValidationError> {
        if self.labels.len() != self.beam_counts.len() {
            return Err(ValidationError::BeamCountMismatch {
                labels: self.labels.len(),
                beam_counts: self.beam_counts.len(),
            });
        }
        Ok(self
            .labels
            .iter()
            .zip(&self.beam_counts)
            .map(|(label, &beam_count)| IsoSlot::new(label.clone(), beam_count))
            .collect())
    }
}

/// A placed isocenter: position, display label, and the number of beams it
/// carries.
///
/// Ordered superior-to-inferior within its field group; never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct IsocenterSpec {
    pub position: Point3,
    pub label: String,
    pub beam_count: usize,
}

impl IsocenterSpec {
    /// Creates a new isocenter specification.
    #[must_use]
    pub fn new(position: Point3, label: impl Into<String>, beam_count: usize) -> Self {
        Self {
            position,
            label: label.into(),
            beam_count,
        }
    }
}
