//! Error types for kernel operations.

use thiserror::Error;

/// Failures raised while building or transforming a solid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A primitive was requested with dimensions that enclose no volume.
    #[error("degenerate {primitive}: {reason}")]
    Degenerate {
        /// Primitive kind, e.g. `"cuboid"`.
        primitive: &'static str,
        /// What was wrong with the parameters.
        reason: String,
    },

    /// A transform whose linear part cannot be inverted.
    #[error("singular transform (determinant {determinant})")]
    SingularTransform {
        /// Determinant of the rejected matrix.
        determinant: f64,
    },

    /// A parameter or matrix entry was NaN or infinite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Result alias for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
