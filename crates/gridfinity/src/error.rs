use build_ops::BuildError;
use geom_kernel::KernelError;

/// Errors from grid part generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid spec: {reason}")]
    InvalidSpec { reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("failed to parse grid spec: {0}")]
    Parse(String),

    #[error("failed to read grid spec: {0}")]
    Io(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Kernel(#[from] KernelError),
}
