pub mod curve;
pub mod point_sequence;

pub use curve::{CubicBezier, Curve, CurveDomain};
pub use point_sequence::PointSequence;
