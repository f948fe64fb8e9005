use geom_kernel::{KernelBundle, KernelId, KernelSolidHandle};
use grid_types::Align3;
use tracing::{debug, info};

use crate::error::BuildError;
use crate::part::{align_solid, Part};

/// How a new solid combines with the part under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Subtract,
}

/// Construction scope for one part.
///
/// Holds the solid built so far; every step replaces it with the kernel's
/// result. `finish` aligns the solid and freezes it into a [`Part`].
#[derive(Debug)]
pub struct PartBuilder {
    label: String,
    current: Option<KernelSolidHandle>,
}

impl PartBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            current: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The solid built so far, if any step has run.
    pub fn current(&self) -> Option<&KernelSolidHandle> {
        self.current.as_ref()
    }

    /// Combine `solid` with the part. The first added solid becomes the part.
    pub fn apply(
        &mut self,
        kb: &mut dyn KernelBundle,
        solid: KernelSolidHandle,
        mode: Mode,
    ) -> Result<(), BuildError> {
        let next = match (&self.current, mode) {
            (None, Mode::Add) => solid,
            (None, Mode::Subtract) => return Err(BuildError::MissingPart),
            (Some(current), Mode::Add) => kb.boolean_union(current, &solid)?,
            (Some(current), Mode::Subtract) => kb.boolean_subtract(current, &solid)?,
        };
        debug!(label = %self.label, ?mode, "applied solid");
        self.current = Some(next);
        Ok(())
    }

    /// Round the given edges of the part.
    pub fn fillet(
        &mut self,
        kb: &mut dyn KernelBundle,
        edges: &[KernelId],
        radius: f64,
    ) -> Result<(), BuildError> {
        let current = self.current.as_ref().ok_or(BuildError::MissingPart)?;
        let filleted = kb.fillet_edges(current, edges, radius)?;
        debug!(label = %self.label, edges = edges.len(), radius, "filleted edges");
        self.current = Some(filleted);
        Ok(())
    }

    /// Hollow the part, leaving `openings` open.
    pub fn shell(
        &mut self,
        kb: &mut dyn KernelBundle,
        openings: &[KernelId],
        thickness: f64,
    ) -> Result<(), BuildError> {
        let current = self.current.as_ref().ok_or(BuildError::MissingPart)?;
        let shelled = kb.shell(current, openings, thickness)?;
        debug!(label = %self.label, thickness, "shelled part");
        self.current = Some(shelled);
        Ok(())
    }

    /// Align the finished solid and freeze it.
    pub fn finish(self, kb: &mut dyn KernelBundle, align: Option<Align3>) -> Result<Part, BuildError> {
        let solid = self.current.ok_or(BuildError::MissingPart)?;
        let (handle, bbox) = align_solid(kb, &solid, align)?;
        info!(
            label = %self.label,
            size = ?bbox.size(),
            faces = kb.list_faces(&handle).len(),
            "part built"
        );
        Ok(Part {
            label: self.label,
            handle,
            bbox,
        })
    }
}
