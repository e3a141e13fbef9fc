use tracing::debug;

use crate::error::{JunctionError, Result};
use crate::host::ImageGeometry;
use crate::model::JunctionSpec;

/// Computes the overlap window between two adjacent fields in a group.
///
/// The window is where the superior field's trailing edge and the inferior
/// field's leading edge deliberately overlap; it is contoured so dose
/// blending across the junction can be evaluated.
pub struct JunctionOverlap {
    superior_z: f64,
    inferior_z: f64,
    /// Signed trailing-edge jaw (Y1) of the superior isocenter's first beam.
    superior_edge_jaw: f64,
    /// Signed leading-edge jaw (Y2) of the inferior isocenter's first beam.
    inferior_edge_jaw: f64,
    /// Operator-supplied margin added to the overlap.
    margin: f64,
    image: ImageGeometry,
}

impl JunctionOverlap {
    /// Creates a new `JunctionOverlap` computation for one adjacent pair.
    #[must_use]
    pub fn new(
        superior_z: f64,
        inferior_z: f64,
        superior_edge_jaw: f64,
        inferior_edge_jaw: f64,
        margin: f64,
        image: ImageGeometry,
    ) -> Self {
        Self {
            superior_z,
            inferior_z,
            superior_edge_jaw,
            inferior_edge_jaw,
            margin,
            image,
        }
    }

    /// Executes the computation.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields do not overlap by at least one slice at
    /// the chosen separation — the requested margin cannot be satisfied and
    /// the operator must adjust inputs.
    pub fn execute(&self) -> Result<JunctionSpec> {
        let field_length = self.superior_edge_jaw.abs() + self.inferior_edge_jaw.abs();
        let separation = (self.inferior_z - self.superior_z).abs();
        let span = (field_length + self.margin - separation).ceil();

        #[allow(clippy::cast_possible_truncation)]
        let slice_count = (span / self.image.z_resolution) as i32;
        if span <= 0.0 || slice_count < 1 {
            return Err(JunctionError::InfeasibleOverlap {
                field_length,
                margin: self.margin,
                separation,
            }
            .into());
        }

        let center_z = self.superior_z + self.superior_edge_jaw - self.margin / 2.0 + span / 2.0;
        #[allow(clippy::cast_possible_truncation)]
        let start_slice =
            ((center_z - span / 2.0 - self.image.origin.z) / self.image.z_resolution).floor()
                as i32;
        debug!(center_z, slice_count, start_slice, "computed junction overlap");

        Ok(JunctionSpec {
            center_z,
            slice_count,
            start_slice,
        })
    }
}
