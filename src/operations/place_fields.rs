use tracing::info;

use crate::error::{HostError, HostFailure, Result, ValidationError};
use crate::host::{BeamId, Confirm, FrameConverter, PlanId, PlanService, StructureId};
use crate::model::{
    ApertureSwapTable, BeamSpec, BeamTemplate, CollimatorOverrideTable, Extent, GroupKind,
    GroupSpec, IsocenterSpec, JunctionSpec, MachineParameters, PlacementPolicy, Prescription,
};

use super::analyze::{CoverageCheck, CoverageReport, ExtentAnalysis};
use super::beams::{validate_templates, ArcFieldAssignment, StaticFieldAssignment};
use super::junction::{JunctionOverlap, TargetFootprint};
use super::placement::{ArcIsoPositions, SeparationCalc, StaticIsoPositions};

/// Everything the placement pipeline needs from the caller.
#[derive(Debug, Clone)]
pub struct PlacementRequest {
    /// Structure the longitudinal extents are measured on (the patient
    /// outline).
    pub body_id: String,
    /// Structure marking the boundary plane between the two field groups.
    /// Required when a static group is requested.
    pub matchline_id: Option<String>,
    /// Margin applied to the body extent; positive contracts.
    pub target_margin: f64,
    /// Rotating-group isocenters, superior to inferior.
    pub arc_group: GroupSpec,
    /// Trailing static-group isocenters, when the target outruns the arcs.
    pub static_group: Option<GroupSpec>,
    /// Identifier for the plan the static fields land in.
    pub static_plan_id: String,
    /// Per-slot collimator/aperture templates for the arc beams.
    pub templates: Vec<BeamTemplate>,
    pub collimator_overrides: CollimatorOverrideTable,
    pub aperture_swaps: ApertureSwapTable,
    /// One plan is created per prescription; beams land in the first.
    pub prescriptions: Vec<Prescription>,
    pub arc_machine: MachineParameters,
    pub static_machine: MachineParameters,
    /// Contour the junction overlap between adjacent arc fields.
    pub contour_junctions: bool,
    /// Operator margin added to each junction overlap.
    pub junction_margin: f64,
    /// Outward offset of the junction footprint polygon.
    pub footprint_margin: f64,
    pub policy: PlacementPolicy,
}

/// One placed field group: the host plan it landed in plus the kernel's own
/// record of what was placed.
#[derive(Debug, Clone)]
pub struct PlacedGroup {
    pub kind: GroupKind,
    pub plan: PlanId,
    pub isocenters: Vec<IsocenterSpec>,
    pub beams: Vec<BeamSpec>,
    pub beam_ids: Vec<BeamId>,
}

/// A contoured junction: the host structure plus its computed overlap window.
#[derive(Debug, Clone, Copy)]
pub struct JunctionRecord {
    pub structure: StructureId,
    pub spec: JunctionSpec,
}

/// Output of a completed placement run.
#[derive(Debug, Clone)]
pub struct PlacementReport {
    /// Arc group first, static group second when present.
    pub groups: Vec<PlacedGroup>,
    pub junctions: Vec<JunctionRecord>,
    pub coverage: CoverageReport,
}

/// The full placement pipeline: extent analysis, isocenter layout, beam
/// assignment, junction contouring, and the final coverage check.
///
/// Runs synchronously to completion. The only suspension is the operator
/// confirmation when a separation must be truncated; every host call is
/// blocking and unretried, and a host failure aborts the run with the step
/// name attached. Nothing created before a failure is rolled back.
pub struct PlaceFields {
    request: PlacementRequest,
}

impl PlaceFields {
    /// Creates a new `PlaceFields` operation.
    #[must_use]
    pub fn new(request: PlacementRequest) -> Self {
        Self { request }
    }

    /// Executes the pipeline against the host.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid inputs (before any host mutation), a
    /// declined separation confirmation, an infeasible junction, or any host
    /// failure.
    pub fn execute(
        &self,
        host: &mut dyn PlanService,
        frame: &dyn FrameConverter,
        confirm: &mut dyn Confirm,
    ) -> Result<PlacementReport> {
        let req = &self.request;

        // Validation: everything checked here fails before the host is touched.
        let rx = req
            .prescriptions
            .first()
            .ok_or(ValidationError::MissingPrescription)?;
        let arc_slots = req.arc_group.slots()?;
        if arc_slots.is_empty() {
            return Err(ValidationError::EmptyFieldGroup.into());
        }
        let static_slots = match &req.static_group {
            Some(group) => group.slots()?,
            None => Vec::new(),
        };
        let split = !static_slots.is_empty();

        let arc_counts: Vec<usize> = arc_slots.iter().map(|slot| slot.beam_count).collect();
        validate_templates(&arc_counts, &req.templates, &req.aperture_swaps)?;

        let body = host
            .find_structure(&req.body_id)
            .ok_or_else(|| ValidationError::MissingStructure(req.body_id.clone()))?;
        let body_vertices = step(host.mesh_vertices(body), "fetch target mesh")?;
        if body_vertices.is_empty() {
            return Err(ValidationError::EmptyGeometry(req.body_id.clone()).into());
        }

        let matchline_z = if split {
            let id = req
                .matchline_id
                .as_deref()
                .ok_or_else(|| ValidationError::MissingStructure("matchline".into()))?;
            let matchline = host
                .find_structure(id)
                .ok_or_else(|| ValidationError::MissingStructure(id.to_owned()))?;
            Some(step(host.center_z(matchline), "locate matchline")?)
        } else {
            None
        };

        let junction_target = if req.contour_junctions && arc_slots.len() > 1 {
            Some(
                host.find_structure(&rx.target_id)
                    .ok_or_else(|| ValidationError::MissingStructure(rx.target_id.clone()))?,
            )
        } else {
            None
        };

        for prescription in &req.prescriptions {
            if host.plan_exists(&prescription.plan_id) {
                return Err(ValidationError::PlanExists(prescription.plan_id.clone()).into());
            }
        }
        if split && host.plan_exists(&req.static_plan_id) {
            return Err(ValidationError::PlanExists(req.static_plan_id.clone()).into());
        }

        // Plan creation.
        info!(plan = %rx.plan_id, "creating plans");
        let arc_plan = step(host.create_plan(&rx.plan_id, rx), "create arc plan")?;
        for prescription in req.prescriptions.iter().skip(1) {
            step(
                host.create_plan(&prescription.plan_id, prescription),
                "create arc plan",
            )?;
        }
        let static_plan = if split {
            Some(step(
                host.create_plan(&req.static_plan_id, rx),
                "create static plan",
            )?)
        } else {
            None
        };

        // Extent and isocenter layout.
        let extent = ExtentAnalysis::new(&body_vertices, req.target_margin).execute()?;
        info!(
            superior = extent.superior_z,
            inferior = extent.inferior_z,
            "analyzed target extent"
        );

        let image = host.image_geometry();
        let lateral = image.user_origin;

        let arc_extent = match matchline_z {
            Some(boundary_z) => Extent::new(extent.superior_z, boundary_z),
            None => extent,
        };
        let separation =
            SeparationCalc::new(arc_extent, arc_slots.len(), &req.policy).execute(confirm)?;
        let arc_isos =
            ArcIsoPositions::new(arc_extent, separation, &arc_slots, lateral, &req.policy)
                .execute(frame);

        let static_isos = if let Some(boundary_z) = matchline_z {
            let static_extent = Extent::new(boundary_z, extent.inferior_z);
            let static_separation =
                SeparationCalc::new(static_extent, static_slots.len(), &req.policy)
                    .execute(confirm)?;
            let last_arc_z = arc_isos.last().map_or(boundary_z, |iso| iso.position.z);
            StaticIsoPositions::new(boundary_z, static_separation, last_arc_z, &static_slots, lateral)
                .execute(frame)
        } else {
            Vec::new()
        };

        // Beam assignment. The counter runs across both groups so direction
        // parity and numbering never reset.
        info!("assigning isocenters and beams");
        let mut beam_counter = 0_usize;
        let matchline_adjacent = matchline_z.map(|_| arc_isos.len() - 1);
        let arc_beams = ArcFieldAssignment::new(
            &arc_isos,
            &req.templates,
            &req.collimator_overrides,
            &req.aperture_swaps,
            matchline_adjacent,
        )
        .execute(&mut beam_counter)?;
        let mut arc_beam_ids = Vec::with_capacity(arc_beams.len());
        for beam in &arc_beams {
            arc_beam_ids.push(step(
                host.add_beam(arc_plan, &req.arc_machine, beam),
                "add arc beam",
            )?);
        }

        // Junction contouring between adjacent arc fields.
        let mut junctions = Vec::new();
        if let Some(target) = junction_target {
            let target_vertices =
                step(host.mesh_vertices(target), "fetch junction target mesh")?;
            let polygon = TargetFootprint::new(&target_vertices, req.footprint_margin).execute()?;

            let mut first_beam_index = Vec::with_capacity(arc_isos.len());
            let mut index = 0;
            for iso in &arc_isos {
                first_beam_index.push(index);
                index += iso.beam_count;
            }

            for i in 1..arc_isos.len() {
                let spec = JunctionOverlap::new(
                    arc_isos[i - 1].position.z,
                    arc_isos[i].position.z,
                    arc_beams[first_beam_index[i - 1]].jaws.y1,
                    arc_beams[first_beam_index[i]].jaws.y2,
                    req.junction_margin,
                    image,
                )
                .execute()?;
                let structure = step(
                    host.create_structure(&format!("TS_jnx{i}")),
                    "create junction structure",
                )?;
                for slice in spec.start_slice..spec.start_slice + spec.slice_count {
                    step(
                        host.add_contour_on_slice(structure, slice, &polygon),
                        "contour junction slice",
                    )?;
                }
                step(host.intersect_with(structure, target), "clip junction to target")?;
                junctions.push(JunctionRecord { structure, spec });
            }
        }

        // Static opposed pairs below the matchline.
        let static_placed = match (static_plan, matchline_z) {
            (Some(plan), Some(boundary_z)) => {
                let beams = StaticFieldAssignment::new(
                    &static_isos,
                    boundary_z,
                    extent.inferior_z,
                    &req.policy,
                )
                .execute(&mut beam_counter);
                let mut beam_ids = Vec::with_capacity(beams.len());
                for beam in &beams {
                    beam_ids.push(step(
                        host.add_beam(plan, &req.static_machine, beam),
                        "add static beam",
                    )?);
                }
                Some((plan, beams, beam_ids))
            }
            _ => None,
        };

        // Coverage check over the composite of both groups.
        let first_iso_z = arc_isos
            .first()
            .map_or(extent.superior_z, |iso| iso.position.z);
        let last_iso_z = static_isos
            .last()
            .or_else(|| arc_isos.last())
            .map_or(extent.inferior_z, |iso| iso.position.z);
        let coverage = CoverageCheck::new(first_iso_z, last_iso_z, extent, &req.policy).execute();

        let mut groups = vec![PlacedGroup {
            kind: GroupKind::Arc,
            plan: arc_plan,
            isocenters: arc_isos,
            beams: arc_beams,
            beam_ids: arc_beam_ids,
        }];
        if let Some((plan, beams, beam_ids)) = static_placed {
            groups.push(PlacedGroup {
                kind: GroupKind::Static,
                plan,
                isocenters: static_isos,
                beams,
                beam_ids,
            });
        }
        info!("placement finished");
        Ok(PlacementReport {
            groups,
            junctions,
            coverage,
        })
    }
}

/// Wraps a host result with the name of the pipeline step that issued it.
fn step<T>(result: std::result::Result<T, HostError>, name: &'static str) -> Result<T> {
    result.map_err(|source| {
        HostFailure {
            step: name,
            source,
        }
        .into()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::PolicyError;
    use crate::host::{AutoConfirm, ImageGeometry, MemoryHost, UserFrame};
    use crate::math::Point3;
    use crate::model::{GantryDirection, JawRect};
    use crate::IsolisError;
    use approx::assert_relative_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn block(x: f64, y: f64, z_top: f64, z_bottom: f64) -> Vec<Point3> {
        vec![
            Point3::new(-x, -y, z_bottom),
            Point3::new(x, y, z_bottom),
            Point3::new(-x, y, z_top),
            Point3::new(x, -y, z_top),
        ]
    }

    fn templates() -> Vec<BeamTemplate> {
        vec![
            BeamTemplate::new(30.0, JawRect::new(-100.0, -200.0, 100.0, 200.0)),
            BeamTemplate::new(330.0, JawRect::new(-100.0, -200.0, 100.0, 200.0)),
            BeamTemplate::new(30.0, JawRect::new(-140.0, -200.0, 10.0, 200.0)),
            BeamTemplate::new(330.0, JawRect::new(-10.0, -200.0, 140.0, 200.0)),
        ]
    }

    fn base_request() -> PlacementRequest {
        PlacementRequest {
            body_id: "body".into(),
            matchline_id: None,
            target_margin: 10.0,
            arc_group: GroupSpec::new(
                vec!["Head".into(), "Chest".into(), "Pelvis".into()],
                vec![4, 4, 2],
            ),
            static_group: None,
            static_plan_id: "_Legs".into(),
            templates: templates(),
            collimator_overrides: CollimatorOverrideTable::default(),
            aperture_swaps: ApertureSwapTable::default(),
            prescriptions: vec![Prescription::new("TBI", "PTV_Body", 6, 2.0, 12.0)],
            arc_machine: MachineParameters::arc("TrueBeam1", "10X"),
            static_machine: MachineParameters::static_fields("TrueBeam1"),
            contour_junctions: true,
            junction_margin: 0.0,
            footprint_margin: 0.0,
            policy: PlacementPolicy::default(),
        }
    }

    fn host_without_matchline() -> MemoryHost {
        let geometry = ImageGeometry {
            origin: Point3::new(0.0, 0.0, -512.0),
            user_origin: Point3::origin(),
            z_resolution: 2.0,
        };
        let mut host = MemoryHost::new(geometry);
        host.seed_structure("body", block(160.0, 90.0, 510.0, -510.0));
        host.seed_structure("PTV_Body", block(150.0, 80.0, 505.0, -505.0));
        host
    }

    #[test]
    fn whole_body_run_places_three_arc_isocenters() {
        init_tracing();
        let mut host = host_without_matchline();
        let report = PlaceFields::new(base_request())
            .execute(&mut host, &UserFrame::identity(), &mut AutoConfirm(false))
            .unwrap();

        assert_eq!(report.groups.len(), 1);
        let group = &report.groups[0];
        assert_eq!(group.kind, GroupKind::Arc);
        // Extent 500 / -500, separation (1000 - 380) / 2 = 310.
        let z: Vec<f64> = group.isocenters.iter().map(|iso| iso.position.z).collect();
        assert_relative_eq!(z[0], 310.0);
        assert_relative_eq!(z[1], 0.0);
        assert_relative_eq!(z[2], -310.0);

        assert_eq!(group.beams.len(), 10);
        assert!(group
            .beams
            .windows(2)
            .all(|w| w[0].direction != w[1].direction));
        assert_eq!(group.beams[0].label, "1 CCW Head");
        assert_eq!(group.beams[9].label, "10 CW Pelvis");

        // Field edges clear both extremes by 10, above the 5-unit limit.
        assert_relative_eq!(report.coverage.superior_margin, 10.0);
        assert_relative_eq!(report.coverage.inferior_margin, 10.0);
        assert!(!report.coverage.insufficient);

        // Beams landed in the host plan.
        let plan = host.plan(group.plan).unwrap();
        assert_eq!(plan.beams.len(), 10);
        let first = host.beam(plan.beams[0]).unwrap();
        assert_eq!(first.machine.energy, "10X");
    }

    #[test]
    fn junctions_are_contoured_and_clipped() {
        let mut host = host_without_matchline();
        let report = PlaceFields::new(base_request())
            .execute(&mut host, &UserFrame::identity(), &mut AutoConfirm(false))
            .unwrap();

        assert_eq!(report.junctions.len(), 2);
        // Field length 400 over a 310 separation: a 90-unit overlap window,
        // 45 slices at 2 mm spacing.
        let upper = &report.junctions[0].spec;
        assert_eq!(upper.slice_count, 45);
        assert_relative_eq!(upper.center_z, 155.0);
        assert_eq!(upper.start_slice, 311);
        let lower = &report.junctions[1].spec;
        assert_relative_eq!(lower.center_z, -155.0);
        assert_eq!(lower.start_slice, 156);

        let target = host.find_structure("PTV_Body").unwrap();
        for record in &report.junctions {
            let data = host.structure(record.structure).unwrap();
            assert_eq!(data.contours.len(), 45);
            assert_eq!(data.intersections, vec![target]);
            // Footprint corners sit at the target's lateral extremes.
            let polygon = &data.contours[0].1;
            assert_relative_eq!(polygon[0].x, 150.0);
            assert_relative_eq!(polygon[4].y, -80.0);
        }
        assert!(host.find_structure("TS_jnx1").is_some());
        assert!(host.find_structure("TS_jnx2").is_some());
    }

    fn split_request() -> PlacementRequest {
        let mut request = base_request();
        request.matchline_id = Some("matchline".into());
        request.arc_group =
            GroupSpec::new(vec!["Head".into(), "Pelvis".into()], vec![4, 4]);
        request.static_group = Some(GroupSpec::new(
            vec!["Upper Legs".into(), "Lower Legs".into()],
            vec![2, 2],
        ));
        request.target_margin = 0.0;
        request.contour_junctions = false;
        request
    }

    fn host_with_matchline() -> MemoryHost {
        let mut host = MemoryHost::new(ImageGeometry {
            origin: Point3::new(0.0, 0.0, -1024.0),
            user_origin: Point3::origin(),
            z_resolution: 2.0,
        });
        host.seed_structure("body", block(160.0, 90.0, 500.0, -1000.0));
        host.seed_structure("PTV_Body", block(150.0, 80.0, 495.0, -995.0));
        host.seed_structure("matchline", vec![Point3::new(0.0, 0.0, -150.0)]);
        host
    }

    #[test]
    fn matchline_splits_the_run_into_two_groups() {
        init_tracing();
        let mut host = host_with_matchline();
        let report = PlaceFields::new(split_request())
            .execute(&mut host, &UserFrame::identity(), &mut AutoConfirm(true))
            .unwrap();

        assert_eq!(report.groups.len(), 2);
        let arcs = &report.groups[0];
        let statics = &report.groups[1];
        assert_eq!(statics.kind, GroupKind::Static);

        // Arc extent 500 / -150: separation 270, isocenters at 310 and 40.
        assert_relative_eq!(arcs.isocenters[0].position.z, 310.0);
        assert_relative_eq!(arcs.isocenters[1].position.z, 40.0);

        // The static separation (850 - 380 = 470) exceeds the cap and was
        // confirmed down to 380; the first static isocenter mirrors the last
        // arc isocenter's 190-unit standoff from the matchline.
        assert_relative_eq!(statics.isocenters[0].position.z, -340.0);
        assert_relative_eq!(statics.isocenters[1].position.z, -720.0);

        // The isocenter adjacent to the matchline runs zeroed collimators on
        // its two main fields and 90 on the third.
        assert_relative_eq!(arcs.beams[4].collimator, 0.0);
        assert_relative_eq!(arcs.beams[5].collimator, 0.0);
        assert_relative_eq!(arcs.beams[6].collimator, 90.0);
        assert_relative_eq!(arcs.beams[7].collimator, 330.0);

        // Static pairs continue the running beam numbering.
        assert_eq!(statics.beams.len(), 4);
        assert_eq!(statics.beams[0].label, "9 AP Upper Legs");
        assert_eq!(statics.beams[1].label, "10 PA Upper Legs");
        assert_eq!(statics.beams[2].label, "11 AP Lower Legs");
        assert!(statics
            .beams
            .iter()
            .all(|beam| beam.direction == GantryDirection::None));

        // Legs region is 850 long, over the half-block threshold: the
        // trailing pair keeps the full field and drops 390 below the first.
        assert_relative_eq!(statics.beams[2].isocenter.z, -730.0);
        assert_relative_eq!(statics.beams[2].jaws.x1, -200.0);
        // Far jaws clamp at the deliverable maximum.
        assert_relative_eq!(statics.beams[0].jaws.x2, 200.0);

        // Both plans exist in the host with their beams.
        assert_eq!(host.plan(arcs.plan).unwrap().beams.len(), 8);
        let legs_plan = host.plan(statics.plan).unwrap();
        assert_eq!(legs_plan.id, "_Legs");
        assert_eq!(legs_plan.beams.len(), 4);
        assert_eq!(
            host.beam(legs_plan.beams[0]).unwrap().machine.energy,
            "6X"
        );
    }

    #[test]
    fn declining_the_separation_prompt_aborts_without_beams() {
        let mut host = host_with_matchline();
        let result = PlaceFields::new(split_request()).execute(
            &mut host,
            &UserFrame::identity(),
            &mut AutoConfirm(false),
        );
        assert!(matches!(
            result,
            Err(IsolisError::Policy(PolicyError::SeparationNotConfirmed {
                ..
            }))
        ));
        // Plans were created before the decision point, but no isocenter was
        // produced and no beam was placed; cleanup is the caller's concern.
        assert_eq!(host.plan_count(), 2);
    }

    #[test]
    fn existing_plan_blocks_the_run_before_mutation() {
        let mut host = host_without_matchline();
        let rx = Prescription::new("TBI", "PTV_Body", 6, 2.0, 12.0);
        host.create_plan("TBI", &rx).unwrap();

        let result = PlaceFields::new(base_request()).execute(
            &mut host,
            &UserFrame::identity(),
            &mut AutoConfirm(false),
        );
        assert!(matches!(
            result,
            Err(IsolisError::Validation(ValidationError::PlanExists(id))) if id == "TBI"
        ));
        assert_eq!(host.plan_count(), 1);
    }

    #[test]
    fn missing_body_structure_is_a_validation_error() {
        let mut host = MemoryHost::new(ImageGeometry::default());
        host.seed_structure("PTV_Body", block(150.0, 80.0, 505.0, -505.0));
        let result = PlaceFields::new(base_request()).execute(
            &mut host,
            &UserFrame::identity(),
            &mut AutoConfirm(false),
        );
        assert!(matches!(
            result,
            Err(IsolisError::Validation(ValidationError::MissingStructure(id))) if id == "body"
        ));
        assert_eq!(host.plan_count(), 0);
    }

    #[test]
    fn requesting_static_fields_without_a_matchline_fails() {
        let mut host = host_without_matchline();
        let mut request = split_request();
        request.matchline_id = None;
        let result = PlaceFields::new(request).execute(
            &mut host,
            &UserFrame::identity(),
            &mut AutoConfirm(true),
        );
        assert!(matches!(
            result,
            Err(IsolisError::Validation(ValidationError::MissingStructure(_)))
        ));
    }

    #[test]
    fn single_isocenter_group_produces_no_junctions() {
        let mut host = host_without_matchline();
        let mut request = base_request();
        request.arc_group = GroupSpec::new(vec!["Head".into()], vec![4]);
        let report = PlaceFields::new(request)
            .execute(&mut host, &UserFrame::identity(), &mut AutoConfirm(true))
            .unwrap();
        assert!(report.junctions.is_empty());
        assert_eq!(report.groups[0].beams.len(), 4);
    }
}
