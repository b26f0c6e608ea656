use crate::error::Result;
use crate::geometry::{Curve, CurveDomain};
use crate::operations::fit::FitResult;

use super::{Polyline, TessellationParams};

/// Tessellates a curve into a polyline with uniform parameter steps.
///
/// The step count is the smallest `n` for which the chord error bound
/// `|B''|max * h^2 / 8` stays within the tolerance, clamped to the segment limits.
pub struct TessellateCurve<'a, C: Curve> {
    curve: &'a C,
    params: TessellationParams,
}

impl<'a, C: Curve> TessellateCurve<'a, C> {
    /// Creates a new `TessellateCurve` operation.
    #[must_use]
    pub fn new(curve: &'a C, params: TessellationParams) -> Self {
        Self { curve, params }
    }

    /// Executes the tessellation, returning a polyline.
    ///
    /// The first and last vertices are the curve evaluated at the ends of its domain.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::InvalidParameters` if the parameters are invalid.
    pub fn execute(&self) -> Result<Polyline> {
        self.params.validate()?;
        let domain = self.curve.domain();
        let n = segment_count(self.curve, &domain, &self.params);
        let span = domain.t_max - domain.t_min;

        let mut points = Vec::with_capacity(n + 1);
        for i in 0..n {
            #[allow(clippy::cast_precision_loss)]
            let t = domain.t_min + span * (i as f64 / n as f64);
            points.push(self.curve.evaluate(t));
        }
        points.push(self.curve.evaluate(domain.t_max));
        Ok(Polyline { points })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn segment_count<C: Curve>(curve: &C, domain: &CurveDomain, params: &TessellationParams) -> usize {
    let span = domain.t_max - domain.t_min;
    let raw = (curve.second_derivative_bound() * span * span / (8.0 * params.tolerance))
        .sqrt()
        .ceil();
    let n = if raw.is_finite() {
        raw.min(params.max_segments as f64) as usize
    } else {
        params.max_segments
    };
    n.clamp(params.min_segments, params.max_segments).max(1)
}

/// Tessellates every curve of a fit result into one continuous polyline.
///
/// Join points shared by consecutive curves appear once.
pub struct TessellateFit<'a> {
    result: &'a FitResult,
    params: TessellationParams,
}

impl<'a> TessellateFit<'a> {
    /// Creates a new `TessellateFit` operation.
    #[must_use]
    pub fn new(result: &'a FitResult, params: TessellationParams) -> Self {
        Self { result, params }
    }

    /// Executes the tessellation.
    ///
    /// # Errors
    ///
    /// Returns `TessellationError::InvalidParameters` if the parameters are invalid.
    pub fn execute(&self) -> Result<Polyline> {
        self.params.validate()?;
        let mut points = Vec::new();
        for curve in self.result {
            let part = TessellateCurve::new(curve, self.params).execute()?;
            let skip = usize::from(!points.is_empty());
            points.extend(part.points.into_iter().skip(skip));
        }
        Ok(Polyline { points })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::CubicBezier;
    use crate::math::Point2;
    use crate::operations::fit::fit_sequence;

    fn sample_curve() -> CubicBezier {
        CubicBezier::new(
            Point2::new(50.0, 300.0),
            Point2::new(150.0, -150.0),
            Point2::new(250.0, 450.0),
            Point2::new(350.0, 50.0),
        )
    }

    fn distance_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
        let ab = b - a;
        let t = ((p - a).dot(&ab) / ab.norm_squared()).clamp(0.0, 1.0);
        nalgebra::distance(p, &(a + ab * t))
    }

    #[test]
    fn straight_curve_uses_minimum_segments() {
        let line = CubicBezier::line(Point2::new(0.0, 0.0), Point2::new(3.0, 3.0));
        let poly = TessellateCurve::new(&line, TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(poly.points.len(), 5);
        assert_eq!(poly.points[0], line.p0);
        assert_eq!(poly.points[4], line.p3);
    }

    #[test]
    fn segment_count_follows_tolerance() {
        let params = TessellationParams {
            tolerance: 1.0,
            ..TessellationParams::default()
        };
        let poly = TessellateCurve::new(&sample_curve(), params).execute().unwrap();
        assert_eq!(poly.points.len(), 30);

        let fine = TessellateCurve::new(&sample_curve(), TessellationParams::default())
            .execute()
            .unwrap();
        assert_eq!(fine.points.len(), 257);
    }

    #[test]
    fn chords_stay_within_tolerance() {
        let params = TessellationParams {
            tolerance: 0.5,
            ..TessellationParams::default()
        };
        let curve = sample_curve();
        let poly = TessellateCurve::new(&curve, params).execute().unwrap();
        #[allow(clippy::cast_precision_loss)]
        let n = (poly.points.len() - 1) as f64;
        for (i, w) in poly.points.windows(2).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let mid = curve.evaluate((i as f64 + 0.5) / n);
            assert!(distance_to_segment(&mid, &w[0], &w[1]) <= params.tolerance);
        }
    }

    #[test]
    fn invalid_params_fail() {
        let params = TessellationParams {
            tolerance: -1.0,
            ..TessellationParams::default()
        };
        assert!(TessellateCurve::new(&sample_curve(), params).execute().is_err());
    }

    #[test]
    fn fit_result_joins_are_not_duplicated() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(20.0, 0.0),
            Point2::new(30.0, 10.0),
        ];
        let result = fit_sequence(&pts, 0.01).unwrap();
        let params = TessellationParams::default();
        let poly = TessellateFit::new(&result, params).execute().unwrap();
        assert_eq!(poly.points.first(), Some(&pts[0]));
        assert_eq!(poly.points.last(), Some(&pts[3]));
        assert!(poly.points.windows(2).all(|w| w[0] != w[1]));
    }
}
