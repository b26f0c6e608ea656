use crate::math::bernstein::{cubic_basis, quadratic_basis};
use crate::math::{Point2, Vector2};

use super::{Curve, CurveDomain};

/// A planar cubic Bezier curve defined by four control points.
///
/// The parametric form is
/// `B(t) = (1-t)^3 P0 + 3(1-t)^2 t P1 + 3(1-t) t^2 P2 + t^3 P3`.
/// The curve passes through `p0` at `t = 0` and `p3` at `t = 1`; `p1` and `p2`
/// shape the end tangents and are not required to lie near the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBezier {
    /// Creates a curve from its four control points.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Creates the straight segment from `p0` to `p3`, with the interior
    /// control points at one and two thirds of the chord.
    ///
    /// Evaluating this curve at `t` yields `p0 + t * (p3 - p0)`.
    #[must_use]
    pub fn line(p0: Point2, p3: Point2) -> Self {
        let chord = p3 - p0;
        Self {
            p0,
            p1: p0 + chord / 3.0,
            p2: p0 + chord * (2.0 / 3.0),
            p3,
        }
    }

    /// Returns the control points in order.
    #[must_use]
    pub fn control_points(&self) -> [Point2; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Evaluates the curve at `t` in closed form.
    ///
    /// `t` is not clamped: values outside `[0, 1]` extrapolate the polynomial.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> Point2 {
        let [b0, b1, b2, b3] = cubic_basis(t);
        Point2::from(
            self.p0.coords * b0 + self.p1.coords * b1 + self.p2.coords * b2 + self.p3.coords * b3,
        )
    }

    /// First derivative `B'(t)`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vector2 {
        let [b0, b1, b2] = quadratic_basis(t);
        ((self.p1 - self.p0) * b0 + (self.p2 - self.p1) * b1 + (self.p3 - self.p2) * b2) * 3.0
    }

    /// Second derivative `B''(t)`.
    #[must_use]
    pub fn second_derivative(&self, t: f64) -> Vector2 {
        let [d0, d1] = self.second_differences();
        (d0 * (1.0 - t) + d1 * t) * 6.0
    }

    /// Second differences of the control polygon, `P0 - 2P1 + P2` and `P1 - 2P2 + P3`.
    #[must_use]
    pub fn second_differences(&self) -> [Vector2; 2] {
        [
            self.p0.coords - self.p1.coords * 2.0 + self.p2.coords,
            self.p1.coords - self.p2.coords * 2.0 + self.p3.coords,
        ]
    }
}

impl Curve for CubicBezier {
    fn evaluate(&self, t: f64) -> Point2 {
        CubicBezier::evaluate(self, t)
    }

    fn derivative(&self, t: f64) -> Vector2 {
        CubicBezier::derivative(self, t)
    }

    fn second_derivative_bound(&self) -> f64 {
        // B'' interpolates linearly between its end values, so its norm peaks at an end.
        let [d0, d1] = self.second_differences();
        6.0 * d0.norm().max(d1.norm())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::unit()
    }

    fn is_closed(&self) -> bool {
        self.p0 == self.p3
    }
}
