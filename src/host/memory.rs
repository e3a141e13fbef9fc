//! In-memory host used by the test suite and as reference documentation for
//! the [`PlanService`] contract. Boolean combination of volumes is delegated
//! to the real host in production; here the request is recorded verbatim.

use slotmap::SlotMap;

use crate::error::HostError;
use crate::math::Point3;
use crate::model::{BeamSpec, MachineParameters, Prescription};

use super::{BeamId, ImageGeometry, PlanId, PlanService, StructureId};

/// A plan held by the in-memory host.
#[derive(Debug, Clone)]
pub struct PlanData {
    pub id: String,
    pub prescription: Prescription,
    pub beams: Vec<BeamId>,
}

/// A structure held by the in-memory host.
#[derive(Debug, Clone, Default)]
pub struct StructureData {
    pub id: String,
    pub vertices: Vec<Point3>,
    /// Per-slice contours added through the service, in call order.
    pub contours: Vec<(i32, Vec<Point3>)>,
    /// Structures this one was intersected with, in call order.
    pub intersections: Vec<StructureId>,
}

/// A beam held by the in-memory host.
#[derive(Debug, Clone)]
pub struct BeamData {
    pub machine: MachineParameters,
    pub spec: BeamSpec,
}

/// Central arena that owns all host entities.
///
/// Entities reference each other via typed IDs (generational indices),
/// mirroring how a real planning system hands out opaque handles.
#[derive(Debug, Default)]
pub struct MemoryHost {
    geometry: ImageGeometry,
    plans: SlotMap<PlanId, PlanData>,
    structures: SlotMap<StructureId, StructureData>,
    beams: SlotMap<BeamId, BeamData>,
}

impl MemoryHost {
    /// Creates a host with the given image geometry and no content.
    #[must_use]
    pub fn new(geometry: ImageGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Seeds a structure with mesh vertices, returning its handle.
    pub fn seed_structure(&mut self, id: impl Into<String>, vertices: Vec<Point3>) -> StructureId {
        self.structures.insert(StructureData {
            id: id.into(),
            vertices,
            contours: Vec::new(),
            intersections: Vec::new(),
        })
    }

    /// Returns a reference to the plan data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale.
    pub fn plan(&self, id: PlanId) -> Result<&PlanData, HostError> {
        self.plans.get(id).ok_or(HostError::PlanNotFound)
    }

    /// Returns a reference to the structure data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale.
    pub fn structure(&self, id: StructureId) -> Result<&StructureData, HostError> {
        self.structures.get(id).ok_or(HostError::StructureNotFound)
    }

    /// Returns a reference to the beam data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale.
    pub fn beam(&self, id: BeamId) -> Result<&BeamData, HostError> {
        self.beams
            .get(id)
            .ok_or(HostError::Rejected("beam handle is stale".into()))
    }

    /// Number of plans currently held.
    #[must_use]
    pub fn plan_count(&self) -> usize {
        self.plans.len()
    }
}

impl PlanService for MemoryHost {
    fn image_geometry(&self) -> ImageGeometry {
        self.geometry
    }

    fn find_structure(&self, id: &str) -> Option<StructureId> {
        self.structures
            .iter()
            .find(|(_, data)| data.id.eq_ignore_ascii_case(id))
            .map(|(key, _)| key)
    }

    fn mesh_vertices(&self, structure: StructureId) -> Result<Vec<Point3>, HostError> {
        Ok(self.structure(structure)?.vertices.clone())
    }

    fn center_z(&self, structure: StructureId) -> Result<f64, HostError> {
        let data = self.structure(structure)?;
        if data.vertices.is_empty() {
            return Err(HostError::Rejected(format!(
                "structure {} has no mesh geometry",
                data.id
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let n = data.vertices.len() as f64;
        Ok(data.vertices.iter().map(|v| v.z).sum::<f64>() / n)
    }

    fn plan_exists(&self, id: &str) -> bool {
        self.plans.values().any(|plan| plan.id == id)
    }

    fn create_plan(
        &mut self,
        id: &str,
        prescription: &Prescription,
    ) -> Result<PlanId, HostError> {
        if self.plan_exists(id) {
            return Err(HostError::Rejected(format!("plan {id} already exists")));
        }
        Ok(self.plans.insert(PlanData {
            id: id.to_owned(),
            prescription: prescription.clone(),
            beams: Vec::new(),
        }))
    }

    fn add_beam(
        &mut self,
        plan: PlanId,
        machine: &MachineParameters,
        beam: &BeamSpec,
    ) -> Result<BeamId, HostError> {
        if !self.plans.contains_key(plan) {
            return Err(HostError::PlanNotFound);
        }
        let beam_id = self.beams.insert(BeamData {
            machine: machine.clone(),
            spec: beam.clone(),
        });
        if let Some(data) = self.plans.get_mut(plan) {
            data.beams.push(beam_id);
        }
        Ok(beam_id)
    }

    fn create_structure(&mut self, id: &str) -> Result<StructureId, HostError> {
        if self.find_structure(id).is_some() {
            return Err(HostError::Rejected(format!(
                "structure {id} already exists"
            )));
        }
        Ok(self.structures.insert(StructureData {
            id: id.to_owned(),
            ..StructureData::default()
        }))
    }

    fn add_contour_on_slice(
        &mut self,
        structure: StructureId,
        slice: i32,
        polygon: &[Point3],
    ) -> Result<(), HostError> {
        let data = self
            .structures
            .get_mut(structure)
            .ok_or(HostError::StructureNotFound)?;
        data.contours.push((slice, polygon.to_vec()));
        Ok(())
    }

    fn intersect_with(
        &mut self,
        structure: StructureId,
        target: StructureId,
    ) -> Result<(), HostError> {
        if !self.structures.contains_key(target) {
            return Err(HostError::StructureNotFound);
        }
        let data = self
            .structures
            .get_mut(structure)
            .ok_or(HostError::StructureNotFound)?;
        data.intersections.push(target);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rx() -> Prescription {
        Prescription::new("TBI", "PTV_Body", 6, 2.0, 12.0)
    }

    #[test]
    fn duplicate_plans_are_rejected() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        host.create_plan("TBI", &rx()).unwrap();
        assert!(host.plan_exists("TBI"));
        assert!(matches!(
            host.create_plan("TBI", &rx()),
            Err(HostError::Rejected(_))
        ));
    }

    #[test]
    fn structure_lookup_ignores_case() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        let id = host.seed_structure("Matchline", vec![Point3::new(0.0, 0.0, -150.0)]);
        assert_eq!(host.find_structure("matchline"), Some(id));
        assert!(host.find_structure("spine").is_none());
    }

    #[test]
    fn center_z_averages_the_mesh() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        let id = host.seed_structure(
            "matchline",
            vec![
                Point3::new(0.0, 0.0, -140.0),
                Point3::new(0.0, 0.0, -160.0),
            ],
        );
        assert_relative_eq!(host.center_z(id).unwrap(), -150.0);
    }

    #[test]
    fn empty_structure_has_no_center() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        let id = host.create_structure("jnx").unwrap();
        assert!(matches!(host.center_z(id), Err(HostError::Rejected(_))));
    }

    #[test]
    fn intersection_requests_are_recorded() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        let target = host.seed_structure("PTV_Body", vec![Point3::new(0.0, 0.0, 0.0)]);
        let jnx = host.create_structure("TS_jnx1").unwrap();
        host.add_contour_on_slice(jnx, 42, &[Point3::new(1.0, 2.0, 0.0)])
            .unwrap();
        host.intersect_with(jnx, target).unwrap();
        let data = host.structure(jnx).unwrap();
        assert_eq!(data.contours.len(), 1);
        assert_eq!(data.intersections, vec![target]);
    }
}
