use super::{Point2, Vector2, EPS_ZERO};
use crate::error::{GeometryError, Result};

/// Computes the unit direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the points coincide (within [`EPS_ZERO`]).
pub fn unit_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    normalized(&(b - a))
}

/// Normalizes a vector.
///
/// # Errors
///
/// Returns `GeometryError::ZeroVector` if the vector length is below [`EPS_ZERO`].
pub fn normalized(v: &Vector2) -> Result<Vector2> {
    let len = v.norm();
    if len < EPS_ZERO || !len.is_finite() {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Returns the cumulative polyline length at every vertex.
///
/// The first entry is `0.0`; entry `i` is the sum of the segment lengths up to vertex `i`.
#[must_use]
pub fn cumulative_lengths(points: &[Point2]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += nalgebra::distance(&points[i - 1], p);
        }
        lengths.push(total);
    }
    lengths
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn unit_direction_basic() {
        let dir = unit_direction(&Point2::new(0.0, 0.0), &Point2::new(3.0, 4.0)).unwrap();
        assert!((dir.x - 0.6).abs() < TOLERANCE);
        assert!((dir.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn unit_direction_coincident_points() {
        let p = Point2::new(1.0, 1.0);
        assert!(unit_direction(&p, &p).is_err());
    }

    #[test]
    fn normalized_rejects_nan() {
        assert!(normalized(&Vector2::new(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn cumulative_lengths_along_3_4_5() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 4.0),
            Point2::new(3.0, 5.0),
        ];
        let d = cumulative_lengths(&pts);
        assert_eq!(d.len(), 4);
        assert!(d[0].abs() < TOLERANCE);
        assert!((d[1] - 5.0).abs() < TOLERANCE);
        assert!((d[2] - 5.0).abs() < TOLERANCE);
        assert!((d[3] - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn cumulative_lengths_empty() {
        assert!(cumulative_lengths(&[]).is_empty());
    }
}
