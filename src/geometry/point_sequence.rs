use crate::error::{FitError, Result};
use crate::math::vector_2d::{cumulative_lengths, unit_direction};
use crate::math::{Point2, Vector2, EPS_ZERO};

/// An ordered sequence of sampled points together with its cumulative chord lengths.
///
/// Index order is the traversal order of the original polyline. The chord
/// lengths are measured once over the whole sequence so that any sub-range
/// can be parameterized without re-walking the points.
#[derive(Debug, Clone)]
pub struct PointSequence {
    points: Vec<Point2>,
    lengths: Vec<f64>,
}

impl PointSequence {
    /// Creates a sequence from sampled points.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        let lengths = cumulative_lengths(&points);
        Self { points, lengths }
    }

    /// Creates a sequence from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the sequence has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn point(&self, index: usize) -> Point2 {
        self.points[index]
    }

    /// Total polyline length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Checks that `[first, last]` is a valid fitting range.
    ///
    /// # Errors
    ///
    /// Returns `FitError::InvalidRange` unless `first < last < len`.
    pub fn check_range(&self, first: usize, last: usize) -> Result<()> {
        if first >= last || last >= self.points.len() {
            return Err(FitError::InvalidRange {
                first,
                last,
                len: self.points.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Polyline length between vertices `first` and `last`.
    #[must_use]
    pub fn range_length(&self, first: usize, last: usize) -> f64 {
        self.lengths[last] - self.lengths[first]
    }

    /// Chord-length parameters for every index in `[first, last]`.
    ///
    /// Entry `k` corresponds to point `first + k`. The first parameter is 0, the
    /// last is 1. A range of zero length maps every point to 0.
    #[must_use]
    pub fn chord_parameters(&self, first: usize, last: usize) -> Vec<f64> {
        let total = self.range_length(first, last);
        if total < EPS_ZERO {
            return vec![0.0; last - first + 1];
        }
        let base = self.lengths[first];
        let mut params: Vec<f64> = self.lengths[first..=last]
            .iter()
            .map(|d| (d - base) / total)
            .collect();
        // Pin the ends so rounding cannot move the curve off its end points.
        if let Some(start) = params.first_mut() {
            *start = 0.0;
        }
        if let Some(end) = params.last_mut() {
            *end = 1.0;
        }
        params
    }

    /// Unit tangent leaving `first`, pointing into the range `[first, last]`.
    ///
    /// Uses the nearest later point that does not coincide with `points[first]`.
    /// Returns `None` when every point in the range coincides with it.
    #[must_use]
    pub fn start_tangent(&self, first: usize, last: usize) -> Option<Vector2> {
        let origin = &self.points[first];
        self.points[first + 1..=last]
            .iter()
            .find_map(|p| unit_direction(origin, p).ok())
    }

    /// Unit tangent leaving `last`, pointing back into the range `[first, last]`.
    ///
    /// Mirror of [`Self::start_tangent`].
    #[must_use]
    pub fn end_tangent(&self, first: usize, last: usize) -> Option<Vector2> {
        let origin = &self.points[last];
        self.points[first..last]
            .iter()
            .rev()
            .find_map(|p| unit_direction(origin, p).ok())
    }

    /// Unit tangent through an interior vertex, oriented in traversal order.
    ///
    /// Prefers the central difference `points[index + 1] - points[index - 1]`,
    /// then the one-sided differences. Returns `None` for an end vertex or when
    /// all three points coincide.
    #[must_use]
    pub fn split_tangent(&self, index: usize) -> Option<Vector2> {
        if index == 0 || index + 1 >= self.points.len() {
            return None;
        }
        let prev = &self.points[index - 1];
        let here = &self.points[index];
        let next = &self.points[index + 1];
        unit_direction(prev, next)
            .or_else(|_| unit_direction(here, next))
            .or_else(|_| unit_direction(prev, here))
            .ok()
    }
}

impl From<Vec<Point2>> for PointSequence {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

impl From<&[Point2]> for PointSequence {
    fn from(points: &[Point2]) -> Self {
        Self::new(points.to_vec())
    }
}
