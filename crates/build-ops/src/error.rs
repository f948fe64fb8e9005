use geom_kernel::KernelError;
use grid_types::{Axis, ProfileError};

/// Errors raised while assembling a part from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("part must be provided")]
    MissingPart,

    #[error("invalid alignment {input:?}: expected {expected} characters")]
    InvalidAlign { input: String, expected: usize },

    #[error("invalid alignment character {ch:?}, expected one of '-', '*', '+'")]
    InvalidShorthand { ch: char },

    #[error("part has no faces along {axis:?}")]
    NoFaces { axis: Axis },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },
}
