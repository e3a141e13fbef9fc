mod arc_positions;
pub mod labels;
mod separation;
mod static_positions;

pub use arc_positions::ArcIsoPositions;
pub use separation::SeparationCalc;
pub use static_positions::StaticIsoPositions;

use crate::host::FrameConverter;
use crate::math::grid::snap_point;
use crate::math::Point3;

/// Snaps a device-frame point to the coarse grid in the user frame, where the
/// rounded values are the ones the operator reads at the console.
pub(crate) fn snap_in_user_frame(point: &Point3, frame: &dyn FrameConverter) -> Point3 {
    let user = frame.to_user(point);
    frame.from_user(&snap_point(&user))
}
