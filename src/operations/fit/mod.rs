//! Least-squares fitting of cubic Bezier curves to sampled points.
//!
//! [`FitSegment`] fits one curve to an index range; [`FitSequence`] splits the
//! whole sequence at its worst-fitting points until every curve is within the
//! requested precision.

mod fit_segment;
mod fit_sequence;
mod reparameterize;

pub use fit_segment::{FitSegment, SegmentFit};
pub use fit_sequence::{FitResult, FitSequence};

use crate::error::{FitError, Result};
use crate::geometry::PointSequence;
use crate::math::Point2;

/// Parameters controlling sequence fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    precision: f64,
    reparameterizations: usize,
}

impl FitParams {
    /// Newton-Raphson refinement passes applied to each candidate curve by default.
    pub const DEFAULT_REPARAMETERIZATIONS: usize = 4;

    /// Creates fitting parameters with the given precision.
    ///
    /// `precision` is the largest Euclidean distance allowed between a sampled
    /// point and the curve covering it, in point units.
    ///
    /// # Errors
    ///
    /// Returns `FitError::InvalidPrecision` if `precision` is not positive and finite.
    pub fn new(precision: f64) -> Result<Self> {
        if !(precision > 0.0 && precision.is_finite()) {
            return Err(FitError::InvalidPrecision(precision).into());
        }
        Ok(Self {
            precision,
            reparameterizations: Self::DEFAULT_REPARAMETERIZATIONS,
        })
    }

    /// Sets the number of Newton-Raphson passes. `0` keeps pure chord-length parameters.
    #[must_use]
    pub fn with_reparameterizations(mut self, passes: usize) -> Self {
        self.reparameterizations = passes;
        self
    }

    /// Returns the precision.
    #[must_use]
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Returns the number of Newton-Raphson passes.
    #[must_use]
    pub fn reparameterizations(&self) -> usize {
        self.reparameterizations
    }
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            precision: 1.0,
            reparameterizations: Self::DEFAULT_REPARAMETERIZATIONS,
        }
    }
}

/// Fits a single cubic to `points[first..=last]` with default parameters.
///
/// # Errors
///
/// Returns `FitError::InvalidRange` unless `first < last < points.len()`.
pub fn fit_segment(points: &[Point2], first: usize, last: usize) -> Result<SegmentFit> {
    let sequence = PointSequence::from(points);
    FitSegment::new(&sequence, first, last).execute()
}

/// Approximates `points` by a contiguous list of cubics, each within `precision`.
///
/// At most `points.len() - 1` curves are produced, so a buffer of
/// `points.len()` entries is always large enough.
///
/// # Errors
///
/// - `FitError::DegenerateInput` if fewer than 2 points are supplied
/// - `FitError::InvalidPrecision` if `precision` is not positive and finite
pub fn fit_sequence(points: &[Point2], precision: f64) -> Result<FitResult> {
    if points.len() < 2 {
        return Err(FitError::DegenerateInput {
            count: points.len(),
        }
        .into());
    }
    let params = FitParams::new(precision)?;
    let sequence = PointSequence::from(points);
    FitSequence::new(&sequence, params).execute()
}
