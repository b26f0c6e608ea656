use tracing::trace;

use crate::error::Result;
use crate::geometry::{CubicBezier, PointSequence};
use crate::math::{Matrix2, Vector2, EPS_ZERO};

use super::reparameterize::reparameterize;
use super::FitParams;

/// One fitted curve and its worst deviation from the points it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFit {
    /// The fitted curve. `p0` and `p3` are copies of the range's end points.
    pub curve: CubicBezier,
    /// Index (into the full sequence) of the point farthest from the curve.
    /// Ties resolve to the lowest index.
    pub max_error_index: usize,
    /// Distance between that point and the curve at the point's parameter.
    pub max_error: f64,
}

/// Fits one cubic Bezier curve to a contiguous range of points.
///
/// # Algorithm
///
/// 1. End points are fixed: `P0 = points[first]`, `P3 = points[last]`.
/// 2. End tangents `e1`, `e2` come from the nearest distinct neighbours.
/// 3. Each point gets a chord-length parameter `u_i`.
/// 4. `P1 = P0 + z1 e1`, `P2 = P3 + z2 e2`, with `z1`, `z2` minimizing
///    `sum |B(u_i) - points[i]|^2` (2x2 normal equations).
/// 5. Optional Newton-Raphson passes move each `u_i` toward the closest curve
///    parameter and re-solve; the best candidate is kept.
///
/// Degenerate ranges (two points, coincident points, no usable tangent) yield
/// the straight chord from `P0` to `P3`.
#[derive(Debug)]
pub struct FitSegment<'a> {
    points: &'a PointSequence,
    first: usize,
    last: usize,
    reparameterizations: usize,
}

impl<'a> FitSegment<'a> {
    /// Creates a fit over the inclusive range `[first, last]`.
    #[must_use]
    pub fn new(points: &'a PointSequence, first: usize, last: usize) -> Self {
        Self {
            points,
            first,
            last,
            reparameterizations: FitParams::DEFAULT_REPARAMETERIZATIONS,
        }
    }

    /// Sets the number of Newton-Raphson passes.
    #[must_use]
    pub fn with_reparameterizations(mut self, passes: usize) -> Self {
        self.reparameterizations = passes;
        self
    }

    /// Executes the fit.
    ///
    /// # Errors
    ///
    /// Returns `FitError::InvalidRange` unless `first < last < points.len()`.
    pub fn execute(&self) -> Result<SegmentFit> {
        self.points.check_range(self.first, self.last)?;
        Ok(fit_range(
            self.points,
            self.first,
            self.last,
            None,
            None,
            self.reparameterizations,
        ))
    }
}

/// Fits `[first, last]`, which must already be a valid range.
///
/// Missing tangents are estimated from the range's own neighbours.
pub(super) fn fit_range(
    points: &PointSequence,
    first: usize,
    last: usize,
    start_tangent: Option<Vector2>,
    end_tangent: Option<Vector2>,
    reparameterizations: usize,
) -> SegmentFit {
    let p0 = points.point(first);
    let p3 = points.point(last);

    if last - first == 1 {
        return SegmentFit {
            curve: CubicBezier::line(p0, p3),
            max_error_index: first,
            max_error: 0.0,
        };
    }

    let mut params = points.chord_parameters(first, last);
    let tangents = start_tangent
        .or_else(|| points.start_tangent(first, last))
        .zip(end_tangent.or_else(|| points.end_tangent(first, last)));
    let Some((e1, e2)) = tangents.filter(|_| points.range_length(first, last) >= EPS_ZERO) else {
        trace!(first, last, "no usable tangent, fitting a straight segment");
        let curve = CubicBezier::line(p0, p3);
        return measure(points, first, curve, &params);
    };

    let mut curve = solve_magnitudes(points, first, &params, e1, e2);
    let mut best = measure(points, first, curve, &params);
    for _ in 0..reparameterizations {
        if best.max_error < EPS_ZERO {
            break;
        }
        params = reparameterize(points, first, &curve, &params);
        curve = solve_magnitudes(points, first, &params, e1, e2);
        let candidate = measure(points, first, curve, &params);
        if candidate.max_error < best.max_error {
            best = candidate;
        }
    }
    best
}

/// Solves the least-squares system for the control point distances along `e1` and `e2`.
fn solve_magnitudes(
    points: &PointSequence,
    first: usize,
    params: &[f64],
    e1: Vector2,
    e2: Vector2,
) -> CubicBezier {
    let last = first + params.len() - 1;
    let p0 = points.point(first);
    let p3 = points.point(last);

    let mut a11 = 0.0;
    let mut a12 = 0.0;
    let mut a22 = 0.0;
    let mut rhs = Vector2::zeros();
    for (k, &t) in params.iter().enumerate() {
        let [b0, b1, b2, b3] = crate::math::bernstein::cubic_basis(t);
        a11 += b1 * b1;
        a12 += b1 * b2;
        a22 += b2 * b2;

        // Residual left once both control points sit on the end points.
        let residual = points.point(first + k).coords - p0.coords * (b0 + b1) - p3.coords * (b2 + b3);
        rhs.x += residual.dot(&e1) * b1;
        rhs.y += residual.dot(&e2) * b2;
    }
    a12 *= e1.dot(&e2);

    let system = Matrix2::new(a11, a12, a12, a22);
    let solution = if system.determinant().abs() < EPS_ZERO {
        None
    } else {
        system.try_inverse().map(|inv| inv * rhs)
    };
    let (z1, z2) = match solution {
        Some(z) if z.x.is_finite() && z.y.is_finite() => (z.x, z.y),
        _ => {
            let z = nalgebra::distance(&p0, &p3) / 3.0;
            trace!(first, last, "singular least-squares system, using chord heuristic");
            (z, z)
        }
    };

    CubicBezier::new(p0, p0 + e1 * z1, p3 + e2 * z2, p3)
}

/// Measures the largest distance between each point and the curve at its parameter.
fn measure(points: &PointSequence, first: usize, curve: CubicBezier, params: &[f64]) -> SegmentFit {
    let mut max_error_index = first;
    let mut max_error = f64::NEG_INFINITY;
    for (k, &t) in params.iter().enumerate() {
        let dist = nalgebra::distance(&curve.evaluate(t), &points.point(first + k));
        // NaN sticks so that callers see a non-finite error.
        if dist > max_error || (dist.is_nan() && !max_error.is_nan()) {
            max_error = dist;
            max_error_index = first + k;
        }
    }
    SegmentFit {
        curve,
        max_error_index,
        max_error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{BezierApproxError, FitError};
    use crate::math::Point2;
    use approx::assert_abs_diff_eq;

    fn sample_points() -> PointSequence {
        PointSequence::from_xy(&[
            (50.0, 300.0),
            (65.0, 240.12),
            (110.0, 139.60),
            (170.0, 132.80),
            (230.0, 181.20),
            (290.0, 186.40),
            (335.0, 102.76),
            (350.0, 50.0),
        ])
    }

    fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
        let ab = b - a;
        let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
        nalgebra::distance(p, &(a + ab * t))
    }

    #[test]
    fn arch_of_four_points_fits_closely() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)]);
        let fit = FitSegment::new(&seq, 0, 3).execute().unwrap();
        assert_eq!(fit.curve.p0, Point2::new(0.0, 0.0));
        assert_eq!(fit.curve.p3, Point2::new(3.0, 0.0));
        assert!(fit.max_error < 0.1, "max_error={}", fit.max_error);
    }

    #[test]
    fn arch_without_reparameterization_uses_chord_lengths() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (1.0, 2.0), (2.0, 2.0), (3.0, 0.0)]);
        let fit = FitSegment::new(&seq, 0, 3)
            .with_reparameterizations(0)
            .execute()
            .unwrap();
        assert!(fit.max_error < 0.3, "max_error={}", fit.max_error);
        // Symmetric input gives mirror-image control points.
        assert_abs_diff_eq!(fit.curve.p1.y, fit.curve.p2.y, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.curve.p1.x, 3.0 - fit.curve.p2.x, epsilon = 1e-9);
    }

    #[test]
    fn recovers_the_generating_curve() {
        // The samples lie on the curve (50,300) (150,-150) (250,450) (350,50).
        let seq = sample_points();
        let fit = FitSegment::new(&seq, 0, 7).execute().unwrap();
        assert!(fit.max_error < 5.0, "max_error={}", fit.max_error);
        assert!(fit.max_error_index > 0 && fit.max_error_index < 7);
    }

    #[test]
    fn reparameterization_never_worsens_the_fit() {
        let seq = sample_points();
        let plain = FitSegment::new(&seq, 0, 7)
            .with_reparameterizations(0)
            .execute()
            .unwrap();
        let refined = FitSegment::new(&seq, 0, 7).execute().unwrap();
        assert!(refined.max_error <= plain.max_error);
    }

    #[test]
    fn two_points_give_chord_thirds() {
        let seq = PointSequence::from_xy(&[(1.0, 1.0), (4.0, 7.0)]);
        let fit = FitSegment::new(&seq, 0, 1).execute().unwrap();
        assert!(fit.max_error.abs() < f64::EPSILON);
        assert_eq!(fit.max_error_index, 0);
        let c = fit.curve;
        assert_abs_diff_eq!(c.p1, Point2::new(2.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(c.p2, Point2::new(3.0, 5.0), epsilon = 1e-12);
        assert!(distance_to_segment(&c.p1, &c.p0, &c.p3) < 1e-12);
        assert!(distance_to_segment(&c.p2, &c.p0, &c.p3) < 1e-12);
    }

    #[test]
    fn interior_range_uses_global_indices() {
        let seq = sample_points();
        let fit = FitSegment::new(&seq, 2, 5).execute().unwrap();
        assert_eq!(fit.curve.p0, seq.point(2));
        assert_eq!(fit.curve.p3, seq.point(5));
        assert!((2..=5).contains(&fit.max_error_index));
    }

    #[test]
    fn coincident_points_collapse_to_a_point() {
        let seq = PointSequence::from_xy(&[(2.0, 2.0), (2.0, 2.0), (2.0, 2.0), (2.0, 2.0)]);
        let fit = FitSegment::new(&seq, 0, 3).execute().unwrap();
        assert!(fit.max_error.abs() < f64::EPSILON);
        for p in fit.curve.control_points() {
            assert_eq!(p, Point2::new(2.0, 2.0));
        }
    }

    #[test]
    fn collinear_points_fit_a_straight_segment() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let fit = FitSegment::new(&seq, 0, 2).execute().unwrap();
        assert!(fit.max_error < 1e-9, "max_error={}", fit.max_error);
        assert_abs_diff_eq!(fit.curve.p1.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.curve.p2.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn closed_loop_keeps_shared_end_point() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (1.0, 1.0), (0.0, 2.0), (-1.0, 1.0), (0.0, 0.0)]);
        let fit = FitSegment::new(&seq, 0, 4).execute().unwrap();
        assert_eq!(fit.curve.p0, fit.curve.p3);
        assert!(fit.max_error.is_finite());
    }

    #[test]
    fn invalid_ranges_fail() {
        let seq = sample_points();
        for (first, last) in [(3, 3), (5, 2), (0, 8), (8, 9)] {
            let err = FitSegment::new(&seq, first, last).execute().unwrap_err();
            assert!(matches!(
                err,
                BezierApproxError::Fit(FitError::InvalidRange { .. })
            ));
        }
    }

    #[test]
    fn ties_resolve_to_first_index() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
        let curve = CubicBezier::line(Point2::new(0.0, 1.0), Point2::new(1.0, 1.0));
        let fit = measure(&seq, 0, curve, &[0.0, 1.0, 0.0, 1.0]);
        assert_eq!(fit.max_error_index, 0);
        assert_abs_diff_eq!(fit.max_error, 1.0);
    }

    #[test]
    fn nan_error_is_reported() {
        let seq = PointSequence::from_xy(&[(0.0, 0.0), (f64::NAN, 1.0), (2.0, 0.0)]);
        let curve = CubicBezier::line(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        let fit = measure(&seq, 0, curve, &[0.0, 0.5, 1.0]);
        assert!(fit.max_error.is_nan());
        assert_eq!(fit.max_error_index, 1);
    }
}
