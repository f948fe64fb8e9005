//! Face and edge selection by geometry.
//!
//! Kernel ids change with every operation, so construction steps find their
//! work surfaces by position: "the highest face along Z", "the circles at the
//! bottom of the pockets". Every query takes the part explicitly.

use geom_kernel::{KernelId, KernelIntrospect, KernelSolidHandle, Plane, TopoKind};
use grid_types::{vector, Axis};

use crate::error::BuildError;

/// Coordinates closer than this along an axis fall in the same group.
pub const GROUP_TOLERANCE: f64 = 1e-6;

/// Angular tolerance for a normal to count as parallel to an axis.
const AXIS_TOLERANCE: f64 = 1e-9;

/// A planar face located by its signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRef {
    pub id: KernelId,
    pub normal: [f64; 3],
    pub center: [f64; 3],
    pub area: f64,
}

impl FaceRef {
    /// A sketch plane on this face, facing along its normal.
    ///
    /// The in-plane x direction follows world X wherever the normal allows.
    pub fn plane(&self) -> Plane {
        let seed = if Axis::X.is_parallel(self.normal, AXIS_TOLERANCE) {
            Axis::Y.unit()
        } else {
            Axis::X.unit()
        };
        let projected = vector::sub(
            seed,
            vector::scale(self.normal, vector::dot(seed, self.normal)),
        );
        Plane {
            origin: self.center,
            x_dir: vector::normalize(projected).unwrap_or(seed),
            z_dir: self.normal,
        }
    }
}

/// An edge located by its signature.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRef {
    pub id: KernelId,
    pub center: [f64; 3],
    pub curve: Option<String>,
    pub length: f64,
}

pub fn require_part(part: Option<&KernelSolidHandle>) -> Result<&KernelSolidHandle, BuildError> {
    part.ok_or(BuildError::MissingPart)
}

/// Faces whose normal lies along `axis`, sorted by position along it.
pub fn axis_faces(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    axis: Axis,
) -> Result<Vec<FaceRef>, BuildError> {
    let part = require_part(part)?;
    let mut faces: Vec<FaceRef> = introspect
        .list_faces(part)
        .into_iter()
        .filter_map(|id| {
            let sig = introspect.compute_signature(id, TopoKind::Face);
            let normal = sig.normal?;
            if !axis.is_parallel(normal, AXIS_TOLERANCE) {
                return None;
            }
            Some(FaceRef {
                id,
                normal,
                center: sig.centroid?,
                area: sig.area.unwrap_or(0.0),
            })
        })
        .collect();
    faces.sort_by(|a, b| axis.coord(a.center).total_cmp(&axis.coord(b.center)));
    Ok(faces)
}

/// `axis_faces` bucketed into groups at equal position, lowest first.
pub fn axis_face_groups(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    axis: Axis,
) -> Result<Vec<Vec<FaceRef>>, BuildError> {
    let faces = axis_faces(introspect, part, axis)?;
    Ok(group_sorted(faces, |f| axis.coord(f.center)))
}

/// The lowest face along `axis`.
pub fn first_face(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    axis: Axis,
) -> Result<FaceRef, BuildError> {
    axis_faces(introspect, part, axis)?
        .into_iter()
        .next()
        .ok_or(BuildError::NoFaces { axis })
}

/// The highest face along `axis`.
pub fn last_face(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    axis: Axis,
) -> Result<FaceRef, BuildError> {
    axis_faces(introspect, part, axis)?
        .pop()
        .ok_or(BuildError::NoFaces { axis })
}

/// Every edge of the part, grouped by the position of its center along `axis`.
pub fn axis_edge_groups(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    axis: Axis,
) -> Result<Vec<Vec<EdgeRef>>, BuildError> {
    let part = require_part(part)?;
    let mut edges: Vec<EdgeRef> = introspect
        .list_edges(part)
        .into_iter()
        .filter_map(|id| {
            let sig = introspect.compute_signature(id, TopoKind::Edge);
            Some(EdgeRef {
                id,
                center: sig.centroid?,
                curve: sig.surface_type,
                length: sig.length.unwrap_or(0.0),
            })
        })
        .collect();
    edges.sort_by(|a, b| axis.coord(a.center).total_cmp(&axis.coord(b.center)));
    Ok(group_sorted(edges, |e| axis.coord(e.center)))
}

/// Edges of `part` matching `targets` by curve type and center.
///
/// Used to find, in a boolean result, the edges a tool solid contributed.
pub fn edges_at(
    introspect: &dyn KernelIntrospect,
    part: Option<&KernelSolidHandle>,
    targets: &[EdgeRef],
) -> Result<Vec<KernelId>, BuildError> {
    let part = require_part(part)?;
    let found = introspect
        .list_edges(part)
        .into_iter()
        .filter(|id| {
            let sig = introspect.compute_signature(*id, TopoKind::Edge);
            let Some(center) = sig.centroid else {
                return false;
            };
            targets.iter().any(|t| {
                t.curve == sig.surface_type
                    && vector::length(vector::sub(t.center, center)) <= GROUP_TOLERANCE
            })
        })
        .collect();
    Ok(found)
}

fn group_sorted<T>(items: Vec<T>, key: impl Fn(&T) -> f64) -> Vec<Vec<T>> {
    let mut groups: Vec<Vec<T>> = Vec::new();
    let mut last_key = f64::NAN;
    for item in items {
        let k = key(&item);
        match groups.last_mut() {
            Some(group) if (k - last_key).abs() <= GROUP_TOLERANCE => group.push(item),
            _ => groups.push(vec![item]),
        }
        last_key = k;
    }
    groups
}
