mod cubic_bezier;

pub use cubic_bezier::CubicBezier;

use crate::math::{Point2, Vector2};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// The unit domain `[0, 1]`.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Trait for parametric curves in the plane.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    ///
    /// Parameters outside the domain are extrapolated, not rejected.
    fn evaluate(&self, t: f64) -> Point2;

    /// Computes the first derivative (unnormalized tangent) at parameter `t`.
    fn derivative(&self, t: f64) -> Vector2;

    /// Upper bound on `|B''(t)|` over the domain, used to size flattening steps.
    fn second_derivative_bound(&self) -> f64;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}
