use crate::error::{Result, ValidationError};
use crate::math::Point3;

/// Axis-aligned 8-point footprint polygon at the target's lateral extremes.
///
/// The polygon is laid on each junction slice and then clipped against the
/// target volume by the host's boolean engine, leaving only the overlap
/// region inside the patient. The mid-edge points keep the contour well
/// sampled for hosts that resample closed polygons.
pub struct TargetFootprint<'a> {
    vertices: &'a [Point3],
    /// Outward offset applied to the lateral extremes.
    margin: f64,
}

impl<'a> TargetFootprint<'a> {
    /// Creates a new `TargetFootprint` operation.
    #[must_use]
    pub fn new(vertices: &'a [Point3], margin: f64) -> Self {
        Self { vertices, margin }
    }

    /// Executes the computation, returning the polygon in slice-plane
    /// coordinates (z carries no information).
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex set is empty.
    pub fn execute(&self) -> Result<[Point3; 8]> {
        if self.vertices.is_empty() {
            return Err(ValidationError::EmptyGeometry("junction target".into()).into());
        }
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for vertex in self.vertices {
            x_min = x_min.min(vertex.x);
            x_max = x_max.max(vertex.x);
            y_min = y_min.min(vertex.y);
            y_max = y_max.max(vertex.y);
        }
        x_min -= self.margin;
        y_min -= self.margin;
        x_max += self.margin;
        y_max += self.margin;

        Ok([
            Point3::new(x_max, y_max, 0.0),
            Point3::new(x_max, 0.0, 0.0),
            Point3::new(x_max, y_min, 0.0),
            Point3::new(0.0, y_min, 0.0),
            Point3::new(x_min, y_min, 0.0),
            Point3::new(x_min, 0.0, 0.0),
            Point3::new(x_min, y_max, 0.0),
            Point3::new(0.0, y_max, 0.0),
        ])
    }
}
