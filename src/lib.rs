//! Approximates a sampled 2-D polyline with a short sequence of cubic Bezier
//! curves, each staying within a caller-chosen distance of the points it covers.
//!
//! ```
//! use bezier_approx::{fit_sequence, Point2};
//!
//! let points = [
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 1.5),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(3.0, 1.5),
//!     Point2::new(4.0, 0.0),
//! ];
//! let result = fit_sequence(&points, 0.5)?;
//! assert_eq!(result.start(), Some(points[0]));
//! assert_eq!(result.end(), Some(points[4]));
//! # Ok::<(), bezier_approx::BezierApproxError>(())
//! ```

pub mod error;
pub mod ffi;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod tessellation;

pub use error::{BezierApproxError, Result};
pub use geometry::{CubicBezier, Curve, PointSequence};
pub use math::{Point2, Vector2};
pub use operations::fit::{
    fit_segment, fit_sequence, FitParams, FitResult, FitSegment, FitSequence, SegmentFit,
};
