//! Error types for the alignment algebra and the outer I/O surface.

use thiserror::Error;

use crate::bounds::Anchor;
use ductkit_kernel::KernelError;

/// Failures raised while building or evaluating geometry.
///
/// `Clone` so a failure recorded mid-chain can be carried forward and
/// reported by the terminal call, and so cached results can be shared.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// An anchor was read from a shape with no extent.
    #[error("undefined bounds: cannot read `{anchor}` of an empty shape")]
    UndefinedBounds {
        /// The anchor that was requested.
        anchor: Anchor,
    },

    /// A batch was paired with a list of the wrong length.
    #[error("{what}: expected {expected} entries, found {found}")]
    ArityMismatch {
        /// What was being paired, e.g. `"matrices"`.
        what: &'static str,
        /// Number of targets.
        expected: usize,
        /// Length of the supplied list.
        found: usize,
    },

    /// The kernel rejected an operation.
    #[error("kernel failure in `{operation}`: {source}")]
    Kernel {
        /// Diagnostic name of the node being evaluated.
        operation: String,
        /// Underlying kernel error.
        #[source]
        source: KernelError,
    },

    /// A mirror plane was given a zero-length normal.
    #[error("mirror plane normal has zero length")]
    ZeroNormal,

    /// A boolean helper was called without any shapes.
    #[error("{0} needs at least one operand")]
    NoOperands(&'static str),

    /// No placement closure is registered under this name.
    #[error("no placement helper named `{0}`")]
    MissingHelper(String),
}

impl FitError {
    pub(crate) fn kernel(operation: impl Into<String>, source: KernelError) -> Self {
        Self::Kernel {
            operation: operation.into(),
            source,
        }
    }
}

/// Errors returned by configuration loading and export.
#[derive(Error, Debug)]
pub enum CadError {
    /// An I/O error occurred while reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for [`crate::Config`].
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    /// Geometry evaluation failed.
    #[error(transparent)]
    Fit(#[from] FitError),
    /// The geometry is empty (no faces to export).
    #[error("Empty geometry")]
    EmptyGeometry,
}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, FitError>;
