mod ids;
pub mod memory;

pub use ids::{BeamId, PlanId, StructureId};
pub use memory::MemoryHost;

use crate::error::HostError;
use crate::math::Point3;
use crate::model::{BeamSpec, MachineParameters, Prescription};

/// Image geometry the placement and junction computations need from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    /// Origin of the image volume in the device frame.
    pub origin: Point3,
    /// User origin; isocenters are seeded at its lateral coordinates.
    pub user_origin: Point3,
    /// Slice spacing along the long axis.
    pub z_resolution: f64,
}

impl Default for ImageGeometry {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            user_origin: Point3::origin(),
            z_resolution: 1.0,
        }
    }
}

/// The host treatment-planning system's geometry and plan service.
///
/// Everything behind this trait is host-owned mutable state; the kernel only
/// holds the opaque handles it gets back and never inspects their internals.
/// Calls are synchronous and unretried — an `Err` aborts the current run, and
/// cleanup of anything created before the failure is the caller's concern.
pub trait PlanService {
    /// Image geometry of the planning CT.
    fn image_geometry(&self) -> ImageGeometry;

    /// Looks up a structure by identifier (case-insensitive).
    fn find_structure(&self, id: &str) -> Option<StructureId>;

    /// Surface mesh vertices of a structure. Empty if it carries no geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale.
    fn mesh_vertices(&self, structure: StructureId) -> Result<Vec<Point3>, HostError>;

    /// Longitudinal center of a structure, used for the matchline plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale or the structure is empty.
    fn center_z(&self, structure: StructureId) -> Result<f64, HostError>;

    /// Whether a plan with this identifier already exists.
    fn plan_exists(&self, id: &str) -> bool;

    /// Creates an empty plan and assigns its prescription.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the plan.
    fn create_plan(&mut self, id: &str, prescription: &Prescription)
        -> Result<PlanId, HostError>;

    /// Adds a beam to a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan handle is stale or the host rejects the
    /// beam.
    fn add_beam(
        &mut self,
        plan: PlanId,
        machine: &MachineParameters,
        beam: &BeamSpec,
    ) -> Result<BeamId, HostError>;

    /// Creates an empty structure.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is taken.
    fn create_structure(&mut self, id: &str) -> Result<StructureId, HostError>;

    /// Adds a closed polygon contour to a structure on one image slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale.
    fn add_contour_on_slice(
        &mut self,
        structure: StructureId,
        slice: i32,
        polygon: &[Point3],
    ) -> Result<(), HostError>;

    /// Replaces `structure` with its boolean intersection with `target`.
    ///
    /// The boolean engine itself is host-owned; the kernel only requests the
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is stale.
    fn intersect_with(
        &mut self,
        structure: StructureId,
        target: StructureId,
    ) -> Result<(), HostError>;
}

/// Conversion between the device frame and the patient-relative user frame.
///
/// Coordinate rounding happens in the user frame so the snapped values are
/// the ones the operator reads at the console.
pub trait FrameConverter {
    fn to_user(&self, point: &Point3) -> Point3;
    fn from_user(&self, point: &Point3) -> Point3;
}

/// Frame conversion that treats the user origin as a pure translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserFrame {
    pub origin: Point3,
}

impl UserFrame {
    /// Creates a converter for the given user origin.
    #[must_use]
    pub fn new(origin: Point3) -> Self {
        Self { origin }
    }

    /// Converter whose user frame coincides with the device frame.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point3::origin())
    }
}

impl FrameConverter for UserFrame {
    fn to_user(&self, point: &Point3) -> Point3 {
        point - self.origin.coords
    }

    fn from_user(&self, point: &Point3) -> Point3 {
        point + self.origin.coords
    }
}

/// Synchronous operator decision point.
///
/// The placement algorithm pauses on this call; it is a human decision, not
/// I/O concurrency. Declining is a cooperative abort.
pub trait Confirm {
    /// Presents `message` and returns the operator's yes/no answer.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Fixed-answer [`Confirm`] implementation for unattended runs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}
