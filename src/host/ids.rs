slotmap::new_key_type! {
    /// Opaque handle to a host-owned treatment plan.
    pub struct PlanId;

    /// Opaque handle to a host-owned structure (contoured volume).
    pub struct StructureId;

    /// Opaque handle to a host-owned beam.
    pub struct BeamId;
}
