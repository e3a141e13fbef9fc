use crate::error::{Result, ValidationError};
use crate::math::Point3;
use crate::model::Extent;

/// Derives the treated volume's superior/inferior extent along the long axis
/// from its surface mesh vertices.
///
/// The margin is subtracted from the superior extreme and added to the
/// inferior extreme: positive values contract the extent, negative values
/// expand it.
pub struct ExtentAnalysis<'a> {
    vertices: &'a [Point3],
    margin: f64,
}

impl<'a> ExtentAnalysis<'a> {
    /// Creates a new `ExtentAnalysis` operation.
    #[must_use]
    pub fn new(vertices: &'a [Point3], margin: f64) -> Self {
        Self { vertices, margin }
    }

    /// Executes the analysis, returning the margined extent.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex set is empty.
    pub fn execute(&self) -> Result<Extent> {
        if self.vertices.is_empty() {
            return Err(ValidationError::EmptyGeometry("target".into()).into());
        }
        let mut max_z = f64::NEG_INFINITY;
        let mut min_z = f64::INFINITY;
        for vertex in self.vertices {
            max_z = max_z.max(vertex.z);
            min_z = min_z.min(vertex.z);
        }
        Ok(Extent::new(max_z - self.margin, min_z + self.margin))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn column(z_values: &[f64]) -> Vec<Point3> {
        z_values.iter().map(|&z| Point3::new(5.0, -3.0, z)).collect()
    }

    #[test]
    fn margin_contracts_both_ends() {
        let vertices = column(&[480.0, 0.0, -510.0]);
        let extent = ExtentAnalysis::new(&vertices, 10.0).execute().unwrap();
        assert_relative_eq!(extent.superior_z, 470.0);
        assert_relative_eq!(extent.inferior_z, -500.0);
    }

    #[test]
    fn negative_margin_expands() {
        let vertices = column(&[100.0, -100.0]);
        let extent = ExtentAnalysis::new(&vertices, -20.0).execute().unwrap();
        assert_relative_eq!(extent.superior_z, 120.0);
        assert_relative_eq!(extent.inferior_z, -120.0);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let result = ExtentAnalysis::new(&[], 0.0).execute();
        assert!(matches!(
            result,
            Err(crate::IsolisError::Validation(
                ValidationError::EmptyGeometry(_)
            ))
        ));
    }
}
