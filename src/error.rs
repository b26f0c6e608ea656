use thiserror::Error;

/// Top-level error type for Bezier approximation.
#[derive(Debug, Error)]
pub enum BezierApproxError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

impl BezierApproxError {
    /// Status code reported across the C boundary for this error.
    ///
    /// `0` is reserved for success; see [`crate::ffi`] for the full table.
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match self {
            Self::Fit(FitError::InvalidRange { .. }) => crate::ffi::BEZIER_APPROX_INVALID_RANGE,
            Self::Fit(FitError::DegenerateInput { .. }) => {
                crate::ffi::BEZIER_APPROX_DEGENERATE_INPUT
            }
            Self::Fit(FitError::BufferTooSmall { .. }) => {
                crate::ffi::BEZIER_APPROX_BUFFER_TOO_SMALL
            }
            Self::Fit(FitError::InvalidPrecision(_)) => {
                crate::ffi::BEZIER_APPROX_INVALID_PRECISION
            }
            Self::Fit(FitError::Cancelled) | Self::Geometry(_) | Self::Tessellation(_) => {
                crate::ffi::BEZIER_APPROX_FAILED
            }
        }
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by curve fitting.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("invalid index range [{first}, {last}] for {len} points")]
    InvalidRange {
        first: usize,
        last: usize,
        len: usize,
    },

    #[error("at least 2 points are required, got {count}")]
    DegenerateInput { count: usize },

    #[error("precision must be positive and finite, got {0}")]
    InvalidPrecision(f64),

    #[error("output buffer holds {capacity} curves but {required} are required")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("fitting was cancelled")]
    Cancelled,
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`BezierApproxError`].
pub type Result<T> = std::result::Result<T, BezierApproxError>;
