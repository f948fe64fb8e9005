use geom_kernel::{Extent, KernelBundle, Plane, Sketch};
use grid_types::TaperStep;
use tracing::debug;

use crate::builder::{Mode, PartBuilder};
use crate::error::BuildError;

/// A sketch on a plane, ready to be extruded along the plane normal.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkFace {
    pub plane: Plane,
    pub sketch: Sketch,
}

impl WorkFace {
    pub fn new(plane: Plane, sketch: Sketch) -> Self {
        Self { plane, sketch }
    }

    /// The end cap left behind by extruding this face through `step`.
    pub fn after(&self, step: &TaperStep) -> Result<WorkFace, BuildError> {
        Ok(WorkFace {
            plane: self.plane.offset(step.height),
            sketch: self.sketch.inset(step.run())?,
        })
    }
}

/// Extrude a stack of tapered steps, each starting on the end cap of the
/// one before, and combine every step with the part.
///
/// Returns the end cap of the last step.
pub fn extrude_steps(
    kb: &mut dyn KernelBundle,
    builder: &mut PartBuilder,
    start: WorkFace,
    steps: &[TaperStep],
    mode: Mode,
) -> Result<WorkFace, BuildError> {
    steps.iter().enumerate().try_fold(start, |face, (i, step)| {
        let tool = kb.extrude_sketch(
            &face.sketch,
            &face.plane,
            &Extent::Amount(step.height),
            step.angle,
        )?;
        builder.apply(kb, tool, mode)?;
        debug!(step = i, height = step.height, angle = step.angle, "extruded taper step");
        face.after(step)
    })
}
