/// The overlap window between two adjacent fields, expressed on the image
/// slice grid.
///
/// One junction exists per adjacent isocenter pair within a field group of
/// two or more isocenters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionSpec {
    /// Longitudinal center of the overlap region.
    pub center_z: f64,
    /// Number of image slices the junction spans. Always at least 1.
    pub slice_count: i32,
    /// Index of the first image slice to contour.
    pub start_slice: i32,
}
