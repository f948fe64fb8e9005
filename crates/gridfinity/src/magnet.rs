use build_ops::{axis_edge_groups, edges_at, symmetric_points, Mode, PartBuilder};
use geom_kernel::{KernelBundle, KernelSolidHandle, Location};
use grid_types::Axis;
use tracing::debug;

use crate::error::GridError;
use crate::standard::GridSpec;

/// Which end of the pockets sits flush with the part surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketOpening {
    /// Pockets open upward, as in a baseplate floor.
    Top,
    /// Pockets open downward, as under a bin foot.
    Bottom,
}

/// One pocket cylinder per quadrant, bases at `base_z`, merged into one tool.
pub fn magnet_pocket_tool(
    kb: &mut dyn KernelBundle,
    spec: &GridSpec,
    base_z: f64,
) -> Result<KernelSolidHandle, GridError> {
    let m = &spec.magnet;
    let mut tool: Option<KernelSolidHandle> = None;
    for p in symmetric_points(m.center) {
        let cylinder = kb.make_cylinder(m.pocket_radius(), m.thickness)?;
        let placed = kb.transform(&cylinder, &Location::at([p[0], p[1], base_z]))?;
        tool = Some(match tool {
            None => placed,
            Some(t) => kb.boolean_union(&t, &placed)?,
        });
    }
    tool.ok_or_else(|| GridError::InvalidParameter {
        reason: "no magnet pockets to cut".to_string(),
    })
}

/// Cut the magnet pockets into the part and round their open rims.
pub fn cut_magnet_pockets(
    kb: &mut dyn KernelBundle,
    builder: &mut PartBuilder,
    spec: &GridSpec,
    base_z: f64,
    opening: PocketOpening,
) -> Result<(), GridError> {
    let tool = magnet_pocket_tool(kb, spec, base_z)?;
    let mut groups = axis_edge_groups(kb.as_introspect(), Some(&tool), Axis::Z)?;
    let rims = match opening {
        PocketOpening::Top => groups.pop(),
        PocketOpening::Bottom => groups.into_iter().next(),
    }
    .unwrap_or_default();

    builder.apply(kb, tool, Mode::Subtract)?;

    let edges = edges_at(kb.as_introspect(), builder.current(), &rims)?;
    if edges.is_empty() {
        return Err(GridError::InvalidParameter {
            reason: "magnet pocket rims not found on the part".to_string(),
        });
    }
    debug!(rims = edges.len(), ?opening, "cut magnet pockets");
    builder.fillet(kb, &edges, spec.magnet.hole_fillet)?;
    Ok(())
}
