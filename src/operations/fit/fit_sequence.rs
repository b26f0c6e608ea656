use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::error::{FitError, Result};
use crate::geometry::{CubicBezier, PointSequence};
use crate::math::{Point2, Vector2};

use super::fit_segment::fit_range;
use super::FitParams;

/// Ordered list of curves approximating a point sequence.
///
/// Consecutive curves share end points: `curves[i].p3 == curves[i + 1].p0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FitResult {
    curves: Vec<CubicBezier>,
}

impl FitResult {
    /// Returns the curves in traversal order.
    #[must_use]
    pub fn curves(&self) -> &[CubicBezier] {
        &self.curves
    }

    /// Consumes the result, returning the curves.
    #[must_use]
    pub fn into_curves(self) -> Vec<CubicBezier> {
        self.curves
    }

    /// Returns the number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns whether there are no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterates over the curves.
    pub fn iter(&self) -> std::slice::Iter<'_, CubicBezier> {
        self.curves.iter()
    }

    /// Start point of the first curve.
    #[must_use]
    pub fn start(&self) -> Option<Point2> {
        self.curves.first().map(|c| c.p0)
    }

    /// End point of the last curve.
    #[must_use]
    pub fn end(&self) -> Option<Point2> {
        self.curves.last().map(|c| c.p3)
    }

    /// Returns whether every curve starts exactly where the previous one ends.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.curves.windows(2).all(|w| w[0].p3 == w[1].p0)
    }
}

impl<'a> IntoIterator for &'a FitResult {
    type Item = &'a CubicBezier;
    type IntoIter = std::slice::Iter<'a, CubicBezier>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

/// A range still waiting to be fitted, with the tangents imposed by its parent split.
#[derive(Debug, Clone, Copy)]
struct PendingRange {
    first: usize,
    last: usize,
    start_tangent: Option<Vector2>,
    end_tangent: Option<Vector2>,
}

/// Approximates a whole point sequence by cubic Bezier curves within a precision.
///
/// # Algorithm
///
/// The full range `[0, N-1]` is fitted with one curve. While a curve misses
/// some point by more than the precision, its range is split at the worst
/// point `k` into `[first, k]` and `[k, last]`; both halves share `k` and the
/// tangent through it. A range of two points always fits exactly, so at most
/// `N - 1` curves are produced.
///
/// Pending ranges live on an explicit stack rather than the call stack.
#[derive(Debug)]
pub struct FitSequence<'a> {
    points: &'a PointSequence,
    params: FitParams,
}

impl<'a> FitSequence<'a> {
    /// Creates a new sequence fit.
    #[must_use]
    pub fn new(points: &'a PointSequence, params: FitParams) -> Self {
        Self { points, params }
    }

    /// Executes the fit.
    ///
    /// # Errors
    ///
    /// Returns `FitError::DegenerateInput` if fewer than 2 points are supplied.
    pub fn execute(&self) -> Result<FitResult> {
        self.run(None)
    }

    /// Executes the fit, aborting once `cancel` becomes `true`.
    ///
    /// The flag is checked before each pending range is fitted.
    ///
    /// # Errors
    ///
    /// - `FitError::DegenerateInput` if fewer than 2 points are supplied
    /// - `FitError::Cancelled` if the flag was raised before completion
    pub fn execute_cancellable(&self, cancel: &AtomicBool) -> Result<FitResult> {
        self.run(Some(cancel))
    }

    fn run(&self, cancel: Option<&AtomicBool>) -> Result<FitResult> {
        let n = self.points.len();
        if n < 2 {
            return Err(FitError::DegenerateInput { count: n }.into());
        }
        let precision = self.params.precision();

        let mut curves = Vec::with_capacity(n - 1);
        let mut pending = vec![PendingRange {
            first: 0,
            last: n - 1,
            start_tangent: self.points.start_tangent(0, n - 1),
            end_tangent: self.points.end_tangent(0, n - 1),
        }];

        while let Some(range) = pending.pop() {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                debug!(fitted = curves.len(), "curve fitting cancelled");
                return Err(FitError::Cancelled.into());
            }

            let fit = fit_range(
                self.points,
                range.first,
                range.last,
                range.start_tangent,
                range.end_tangent,
                self.params.reparameterizations(),
            );

            if range.last - range.first == 1 || fit.max_error <= precision {
                trace!(
                    first = range.first,
                    last = range.last,
                    max_error = fit.max_error,
                    "accepted curve"
                );
                curves.push(fit.curve);
                continue;
            }

            let split = if range.first < fit.max_error_index && fit.max_error_index < range.last {
                fit.max_error_index
            } else {
                // Only reachable with non-finite input; any interior split still terminates.
                range.first + (range.last - range.first) / 2
            };
            trace!(
                first = range.first,
                last = range.last,
                split,
                max_error = fit.max_error,
                "splitting range"
            );

            let tangent = self.points.split_tangent(split);
            // Right half first so the left half is fitted (and emitted) first.
            pending.push(PendingRange {
                first: split,
                last: range.last,
                start_tangent: tangent,
                end_tangent: range.end_tangent,
            });
            pending.push(PendingRange {
                first: range.first,
                last: split,
                start_tangent: range.start_tangent,
                end_tangent: tangent.map(|t| -t),
            });
        }

        debug!(
            points = n,
            precision,
            curves = curves.len(),
            "fitted point sequence"
        );
        Ok(FitResult { curves })
    }
}
