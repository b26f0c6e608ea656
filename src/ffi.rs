//! C-compatible boundary over the fitting operations.
//!
//! Points and curves cross the boundary as fixed-layout `#[repr(C)]` structs;
//! arrays are passed as pointer plus length with caller-owned storage. Every
//! function returns a status code instead of unwinding:
//!
//! | code | meaning |
//! |------|---------|
//! | `0`  | success |
//! | `-1` | failure (null pointer, cancellation, internal panic) |
//! | `-2` | invalid index range |
//! | `-3` | fewer than two points |
//! | `-4` | output buffer too small |
//! | `-5` | precision not positive |
//!
//! The matching declarations are in `include/bezier_approx.h`.

#![allow(unsafe_code)]

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::error::{BezierApproxError, FitError, Result};
use crate::geometry::{CubicBezier, PointSequence};
use crate::math::Point2;
use crate::operations::fit::{fit_sequence, FitSegment};

pub const BEZIER_APPROX_OK: i32 = 0;
pub const BEZIER_APPROX_FAILED: i32 = -1;
pub const BEZIER_APPROX_INVALID_RANGE: i32 = -2;
pub const BEZIER_APPROX_DEGENERATE_INPUT: i32 = -3;
pub const BEZIER_APPROX_BUFFER_TOO_SMALL: i32 = -4;
pub const BEZIER_APPROX_INVALID_PRECISION: i32 = -5;

/// A point with `f64` coordinates, laid out as two consecutive doubles.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BezierApproxPoint {
    pub x: f64,
    pub y: f64,
}

/// The four control points of a cubic curve, laid out consecutively.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BezierApproxCurve3Controls {
    pub p0: BezierApproxPoint,
    pub p1: BezierApproxPoint,
    pub p2: BezierApproxPoint,
    pub p3: BezierApproxPoint,
}

impl From<BezierApproxPoint> for Point2 {
    fn from(p: BezierApproxPoint) -> Self {
        Point2::new(p.x, p.y)
    }
}

impl From<Point2> for BezierApproxPoint {
    fn from(p: Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<BezierApproxCurve3Controls> for CubicBezier {
    fn from(c: BezierApproxCurve3Controls) -> Self {
        CubicBezier::new(c.p0.into(), c.p1.into(), c.p2.into(), c.p3.into())
    }
}

impl From<CubicBezier> for BezierApproxCurve3Controls {
    fn from(c: CubicBezier) -> Self {
        Self {
            p0: c.p0.into(),
            p1: c.p1.into(),
            p2: c.p2.into(),
            p3: c.p3.into(),
        }
    }
}

/// Fits `points` and writes the curves into `out`, returning how many were written.
///
/// On `FitError::BufferTooSmall` nothing is written; the error carries the
/// required count. A buffer of `points.len()` entries is always large enough.
///
/// # Errors
///
/// - `FitError::DegenerateInput` if fewer than 2 points are supplied
/// - `FitError::InvalidPrecision` if `precision` is not positive and finite
/// - `FitError::BufferTooSmall` if `out` cannot hold every curve
pub fn fit_sequence_into(
    points: &[BezierApproxPoint],
    precision: f64,
    out: &mut [BezierApproxCurve3Controls],
) -> Result<usize> {
    let points: Vec<Point2> = points.iter().copied().map(Point2::from).collect();
    let result = fit_sequence(&points, precision)?;
    if result.len() > out.len() {
        return Err(FitError::BufferTooSmall {
            required: result.len(),
            capacity: out.len(),
        }
        .into());
    }
    for (slot, curve) in out.iter_mut().zip(result.iter()) {
        *slot = (*curve).into();
    }
    Ok(result.len())
}

/// Fits one curve to `points[first..=last]`.
///
/// # Errors
///
/// Returns `FitError::InvalidRange` unless `first < last < points.len()`.
pub fn fit_segment_controls(
    points: &[BezierApproxPoint],
    first: usize,
    last: usize,
) -> Result<BezierApproxCurve3Controls> {
    let sequence = PointSequence::new(points.iter().copied().map(Point2::from).collect());
    let fit = FitSegment::new(&sequence, first, last).execute()?;
    Ok(fit.curve.into())
}

/// Evaluates the cubic curve `controls` at parameter `t`.
///
/// Never fails; `t` outside `[0, 1]` extrapolates.
#[no_mangle]
pub extern "C" fn bezier_approx_evaluate(
    controls: BezierApproxCurve3Controls,
    t: f64,
) -> BezierApproxPoint {
    CubicBezier::from(controls).evaluate(t).into()
}

/// Fits one cubic curve to the points `first..=last` of `points`.
///
/// On success writes the curve to `*controls` and returns `0`; otherwise
/// leaves `*controls` untouched.
///
/// # Safety
///
/// `points` must be valid for reads of `points_len` elements, and `controls`
/// must be valid for a write of one element. Either may be null, which
/// returns `-1`.
#[no_mangle]
pub unsafe extern "C" fn bezier_approx_fit_segment(
    points: *const BezierApproxPoint,
    points_len: i32,
    first: i32,
    last: i32,
    controls: *mut BezierApproxCurve3Controls,
) -> i32 {
    if points.is_null() || controls.is_null() {
        return BEZIER_APPROX_FAILED;
    }
    let (Ok(len), Ok(first), Ok(last)) = (
        usize::try_from(points_len),
        usize::try_from(first),
        usize::try_from(last),
    ) else {
        return BEZIER_APPROX_INVALID_RANGE;
    };
    // SAFETY: non-null and, per the contract, valid for `len` reads.
    let points = unsafe { std::slice::from_raw_parts(points, len) };

    guarded(|| {
        let curve = fit_segment_controls(points, first, last)?;
        // SAFETY: non-null and, per the contract, valid for one write.
        unsafe { controls.write(curve) };
        Ok(())
    })
}

/// Approximates `points` by cubic curves, each within `precision` of the points it covers.
///
/// `*controls_buffer_size` holds the capacity of `controls_buffer` on entry.
/// On success it receives the number of curves written. On `-4` (buffer too
/// small) the buffer is left untouched and it receives the required count, so
/// the call can be retried. On any other failure it receives `0`.
/// `count` entries always suffice.
///
/// # Safety
///
/// `points` must be valid for reads of `count` elements, `controls_buffer`
/// for writes of `*controls_buffer_size` elements, and `controls_buffer_size`
/// for a read and a write. Null pointers return `-1`.
#[no_mangle]
pub unsafe extern "C" fn bezier_approx_fit_sequence(
    points: *const BezierApproxPoint,
    count: i32,
    precision: f64,
    controls_buffer: *mut BezierApproxCurve3Controls,
    controls_buffer_size: *mut i32,
) -> i32 {
    if controls_buffer_size.is_null() {
        return BEZIER_APPROX_FAILED;
    }
    // SAFETY: non-null and, per the contract, valid for reads and writes.
    let size = unsafe { &mut *controls_buffer_size };
    let capacity = usize::try_from(*size).unwrap_or(0);

    let count = usize::try_from(count).unwrap_or(0);
    if count < 2 {
        *size = 0;
        return BEZIER_APPROX_DEGENERATE_INPUT;
    }
    if points.is_null() || (controls_buffer.is_null() && capacity > 0) {
        *size = 0;
        return BEZIER_APPROX_FAILED;
    }

    // SAFETY: non-null and, per the contract, valid for `count` reads.
    let points = unsafe { std::slice::from_raw_parts(points, count) };
    let out: &mut [BezierApproxCurve3Controls] = if capacity == 0 {
        &mut []
    } else {
        // SAFETY: non-null and, per the contract, valid for `capacity` writes.
        unsafe { std::slice::from_raw_parts_mut(controls_buffer, capacity) }
    };

    let mut reported = 0;
    let status = guarded(|| match fit_sequence_into(points, precision, out) {
        Ok(written) => {
            reported = written;
            Ok(())
        }
        Err(err) => {
            if let BezierApproxError::Fit(FitError::BufferTooSmall { required, .. }) = err {
                reported = required;
            }
            Err(err)
        }
    });
    *size = i32::try_from(reported).unwrap_or(i32::MAX);
    status
}

/// Runs `f`, mapping errors and panics to status codes.
fn guarded<F>(f: F) -> i32
where
    F: FnOnce() -> Result<()>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => BEZIER_APPROX_OK,
        Ok(Err(err)) => {
            debug!(%err, "bezier approximation failed");
            err.status_code()
        }
        Err(_) => BEZIER_APPROX_FAILED,
    }
}
