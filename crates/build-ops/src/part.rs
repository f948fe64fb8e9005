use geom_kernel::{BoundingBox, KernelBundle, KernelSolidHandle, Location};
use grid_types::Align3;

use crate::error::BuildError;

/// A finished solid. Built once, never modified afterwards.
#[derive(Debug, Clone)]
pub struct Part {
    pub(crate) label: String,
    pub(crate) handle: KernelSolidHandle,
    pub(crate) bbox: BoundingBox,
}

impl Part {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn handle(&self) -> &KernelSolidHandle {
        &self.handle
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    pub fn size(&self) -> [f64; 3] {
        self.bbox.size()
    }

    /// A placed copy of this part's solid; the part itself is untouched.
    pub fn located(
        &self,
        kb: &mut dyn KernelBundle,
        location: &Location,
    ) -> Result<KernelSolidHandle, BuildError> {
        Ok(kb.transform(&self.handle, location)?)
    }
}

/// Move `solid` so its bounds sit on the requested anchors.
///
/// Returns the (possibly new) solid with its bounds. `None` leaves the solid
/// where it was built.
pub fn align_solid(
    kb: &mut dyn KernelBundle,
    solid: &KernelSolidHandle,
    align: Option<Align3>,
) -> Result<(KernelSolidHandle, BoundingBox), BuildError> {
    let bbox = bounds_of(kb, solid)?;
    let Some(align) = align else {
        return Ok((solid.clone(), bbox));
    };
    let shift = [
        align[0].offset(bbox.min[0], bbox.max[0]),
        align[1].offset(bbox.min[1], bbox.max[1]),
        align[2].offset(bbox.min[2], bbox.max[2]),
    ];
    if shift.iter().all(|s| *s == 0.0) {
        return Ok((solid.clone(), bbox));
    }
    let moved = kb.transform(solid, &Location::at(shift))?;
    let bbox = bounds_of(kb, &moved)?;
    Ok((moved, bbox))
}

fn bounds_of(kb: &dyn KernelBundle, solid: &KernelSolidHandle) -> Result<BoundingBox, BuildError> {
    kb.bounding_box(solid)
        .ok_or_else(|| BuildError::InvalidParameter {
            reason: "solid has no bounding box".to_string(),
        })
}
