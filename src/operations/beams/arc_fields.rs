use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::model::{
    ApertureSwapTable, BeamSpec, BeamTemplate, CollimatorOverrideTable, GantryDirection, IsoRole,
    IsocenterSpec,
};

/// Gantry sweep for counter-clockwise arcs: a near-full rotation passing
/// through 180.
const CCW_SWEEP: (f64, f64) = (179.0, 181.0);
/// The complementary clockwise sweep.
const CW_SWEEP: (f64, f64) = (181.0, 179.0);

/// Assigns the full ordered beam sequence for a rotating field group.
///
/// Rotation direction alternates on the running count of beams placed so far
/// across all isocenters, not per isocenter, so consecutive fields always
/// sweep opposite ways. Collimator angles and apertures come from the per-slot
/// templates, adjusted by the clinical override tables.
pub struct ArcFieldAssignment<'a> {
    isocenters: &'a [IsocenterSpec],
    templates: &'a [BeamTemplate],
    collimator_overrides: &'a CollimatorOverrideTable,
    aperture_swaps: &'a ApertureSwapTable,
    /// Index of the isocenter immediately superior to the matchline, when a
    /// static group follows this one.
    matchline_adjacent: Option<usize>,
}

impl<'a> ArcFieldAssignment<'a> {
    /// Creates a new `ArcFieldAssignment` operation.
    #[must_use]
    pub fn new(
        isocenters: &'a [IsocenterSpec],
        templates: &'a [BeamTemplate],
        collimator_overrides: &'a CollimatorOverrideTable,
        aperture_swaps: &'a ApertureSwapTable,
        matchline_adjacent: Option<usize>,
    ) -> Self {
        Self {
            isocenters,
            templates,
            collimator_overrides,
            aperture_swaps,
            matchline_adjacent,
        }
    }

    /// Executes the assignment.
    ///
    /// `beam_counter` is the running total of beams placed so far in this
    /// run; it drives direction parity and beam numbering and is left at the
    /// updated total for the next field group.
    ///
    /// # Errors
    ///
    /// Returns an error if a beam slot resolves beyond the template list.
    pub fn execute(&self, beam_counter: &mut usize) -> Result<Vec<BeamSpec>> {
        let beam_counts: Vec<usize> = self.isocenters.iter().map(|iso| iso.beam_count).collect();
        validate_templates(&beam_counts, self.templates, self.aperture_swaps)?;
        let mut beams = Vec::new();
        for (i, iso) in self.isocenters.iter().enumerate() {
            let role = if self.matchline_adjacent == Some(i) {
                IsoRole::MatchlineAdjacent
            } else {
                IsoRole::Interior
            };
            for slot in 0..iso.beam_count {
                // The swap redirects the jaws only; the collimator angle
                // stays with the slot.
                let aperture = self.templates[self.aperture_swaps.resolve(i, slot)].aperture;
                let collimator = self
                    .collimator_overrides
                    .lookup(role, slot)
                    .unwrap_or(self.templates[slot].collimator);

                let (direction, sweep) = if *beam_counter % 2 == 0 {
                    (GantryDirection::CounterClockwise, CCW_SWEEP)
                } else {
                    (GantryDirection::Clockwise, CW_SWEEP)
                };
                let suffix = if slot >= 2 { "90" } else { "" };
                let label = format!(
                    "{} {} {}{}",
                    *beam_counter + 1,
                    direction.tag(),
                    iso.label,
                    suffix
                );
                debug!(label = %label, collimator, "assigned arc beam");

                beams.push(BeamSpec {
                    jaws: aperture,
                    collimator,
                    direction,
                    gantry_start: sweep.0,
                    gantry_stop: sweep.1,
                    isocenter: iso.position,
                    label,
                    leaves: None,
                });
                *beam_counter += 1;
            }
        }
        Ok(beams)
    }
}

/// Checks that every beam slot resolves to a template entry, directly or
/// through an aperture swap.
///
/// Callers must supply templates sized to the largest beam count any
/// isocenter uses; a shortfall is a configuration error caught before any
/// host state is touched.
///
/// # Errors
///
/// Returns an error naming the first out-of-range slot.
pub fn validate_templates(
    beam_counts: &[usize],
    templates: &[BeamTemplate],
    swaps: &ApertureSwapTable,
) -> Result<()> {
    for (i, &count) in beam_counts.iter().enumerate() {
        for slot in 0..count {
            let needed = slot.max(swaps.resolve(i, slot));
            if needed >= templates.len() {
                return Err(ValidationError::TemplateIndexOutOfRange {
                    slot: needed,
                    available: templates.len(),
                }
                .into());
            }
        }
    }
    Ok(())
}
