//! Helper functions: error type, mock builds, topology counts, part summaries.

use build_ops::Part;
use geom_kernel::{KernelId, KernelIntrospect, KernelSolidHandle, MockKernel, TopoKind};
use grid_types::BoundingBox;
use gridfinity::GridError;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("build failed ({part}): {reason}")]
    BuildFailed { part: String, reason: String },
}

// ── Builds ──────────────────────────────────────────────────────────────────

/// Run a generator against a fresh mock kernel.
///
/// Returns the kernel alongside the part so callers can inspect topology.
pub fn build_mock<F>(name: &str, build: F) -> Result<(MockKernel, Part), HarnessError>
where
    F: FnOnce(&mut MockKernel) -> Result<Part, GridError>,
{
    let mut kernel = MockKernel::new();
    let part = build(&mut kernel).map_err(|e| HarnessError::BuildFailed {
        part: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((kernel, part))
}

// ── Topology ────────────────────────────────────────────────────────────────

/// (faces, edges) of a solid.
pub fn topology_counts(introspect: &dyn KernelIntrospect, solid: &KernelSolidHandle) -> (usize, usize) {
    (
        introspect.list_faces(solid).len(),
        introspect.list_edges(solid).len(),
    )
}

/// Number of faces with the given surface type.
pub fn surface_count(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    surface: &str,
) -> usize {
    introspect
        .list_faces(solid)
        .into_iter()
        .filter(|f| {
            introspect
                .compute_signature(*f, TopoKind::Face)
                .surface_type
                .as_deref()
                == Some(surface)
        })
        .count()
}

/// Box around the outer boundary of a face.
pub fn face_extent(introspect: &dyn KernelIntrospect, face: KernelId) -> Option<BoundingBox> {
    BoundingBox::from_points(introspect.face_outer_wire(face))
}

// ── Summaries ───────────────────────────────────────────────────────────────

/// One-line description of a part, used in assertion failures.
pub fn describe(introspect: &dyn KernelIntrospect, part: &Part) -> String {
    let size = part.size();
    let (faces, edges) = topology_counts(introspect, part.handle());
    format!(
        "{}: {:.3} x {:.3} x {:.3}, {} faces, {} edges",
        part.label(),
        size[0],
        size[1],
        size[2],
        faces,
        edges
    )
}
