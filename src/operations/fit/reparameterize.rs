use crate::geometry::{CubicBezier, PointSequence};
use crate::math::EPS_ZERO;

/// One Newton-Raphson pass moving each interior parameter toward the curve
/// parameter closest to its point.
///
/// Solves `(B(t) - p) . B'(t) = 0` for each point `p`. End parameters stay
/// fixed at their chord values and results are clamped to `[0, 1]`.
pub(super) fn reparameterize(
    points: &PointSequence,
    first: usize,
    curve: &CubicBezier,
    params: &[f64],
) -> Vec<f64> {
    let n = params.len();
    params
        .iter()
        .enumerate()
        .map(|(k, &t)| {
            if k == 0 || k + 1 == n {
                return t;
            }
            newton_step(curve, &points.point(first + k), t)
        })
        .collect()
}

fn newton_step(curve: &CubicBezier, target: &crate::math::Point2, t: f64) -> f64 {
    let diff = curve.evaluate(t) - target;
    let d1 = curve.derivative(t);
    let d2 = curve.second_derivative(t);
    let numerator = diff.dot(&d1);
    let denominator = d1.dot(&d1) + diff.dot(&d2);
    if denominator.abs() < EPS_ZERO {
        return t;
    }
    let next = t - numerator / denominator;
    if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        t
    }
}
