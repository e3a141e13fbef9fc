use super::Point3;

/// Spacing of the coarse placement grid.
///
/// Isocenter coordinates and inter-isocenter separations are snapped to whole
/// centimeters (10 length units) so positions land on values a therapist can
/// set at the couch.
pub const GRID: f64 = 10.0;

/// Rounds a length to the nearest grid increment.
#[must_use]
pub fn round_to_grid(value: f64) -> f64 {
    (value / GRID).round() * GRID
}

/// Snaps all three coordinates of a point to the grid.
#[must_use]
pub fn snap_point(point: &Point3) -> Point3 {
    Point3::new(
        round_to_grid(point.x),
        round_to_grid(point.y),
        round_to_grid(point.z),
    )
}
