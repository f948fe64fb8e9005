// Re-export shared types from grid-types
pub use grid_types::{BoundingBox, Location, Plane, Profile, Sketch, TopoKind, TopoSignature};

/// Opaque handle to a solid in the geometry kernel.
/// Valid only for the kernel session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Transient kernel-internal entity identifier.
/// Stable within a single kernel session; every operation mints new ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelId(pub u64);

/// How far an extrusion travels along its sketch plane normal.
#[derive(Debug, Clone)]
pub enum Extent {
    /// A fixed signed distance.
    Amount(f64),
    /// Up to the farthest point of `target` along the normal.
    UntilLast(KernelSolidHandle),
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("shell failed: {reason}")]
    ShellFailed { reason: String },

    #[error("sweep failed: {reason}")]
    SweepFailed { reason: String },

    #[error("degenerate sketch: {reason}")]
    DegenerateSketch { reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("entity not found: {id:?}")]
    EntityNotFound { id: KernelId },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
}
