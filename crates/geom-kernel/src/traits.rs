use crate::types::*;

/// Core geometry kernel trait: shape construction and modification.
///
/// Every call returns a fresh solid; inputs are never mutated, so a handle
/// stays valid (and its geometry unchanged) for the whole session.
pub trait Kernel {
    /// Axis-aligned box centered on the origin.
    fn make_box(&mut self, size: [f64; 3]) -> Result<KernelSolidHandle, KernelError>;

    /// Cylinder along +Z with its base circle centered on the origin.
    fn make_cylinder(&mut self, radius: f64, height: f64)
        -> Result<KernelSolidHandle, KernelError>;

    /// Extrude a sketch from `plane` along the plane normal.
    ///
    /// A positive `taper` (degrees) narrows the added shapes as the
    /// extrusion proceeds; subtracted shapes widen by the same amount.
    fn extrude_sketch(
        &mut self,
        sketch: &Sketch,
        plane: &Plane,
        extent: &Extent,
        taper: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Sweep a closed section, drawn on `section_plane`, around a closed path.
    fn sweep_section(
        &mut self,
        section: &Profile,
        section_plane: &Plane,
        path: &[[f64; 3]],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Fillet (round) the specified edges with the given radius.
    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Hollow a solid to `thickness`, leaving the given faces open.
    fn shell(
        &mut self,
        solid: &KernelSolidHandle,
        faces_to_remove: &[KernelId],
        thickness: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Place a copy of a solid at `location`.
    fn transform(
        &mut self,
        solid: &KernelSolidHandle,
        location: &Location,
    ) -> Result<KernelSolidHandle, KernelError>;
}

/// Topology introspection trait. Provides read-only queries on kernel geometry.
pub trait KernelIntrospect {
    /// List all faces of a solid.
    fn list_faces(&self, solid: &KernelSolidHandle) -> Vec<KernelId>;

    /// List all edges of a solid.
    fn list_edges(&self, solid: &KernelSolidHandle) -> Vec<KernelId>;

    /// Compute the geometric signature of a single entity.
    fn compute_signature(&self, entity: KernelId, kind: TopoKind) -> TopoSignature;

    /// Points of a planar face's outer boundary, in order. Empty for curved faces.
    fn face_outer_wire(&self, face: KernelId) -> Vec<[f64; 3]>;

    /// Axis-aligned bounds of a solid.
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox>;
}

/// Combined trait for builders that need both mutable Kernel access
/// and read-only KernelIntrospect access on the same object.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
