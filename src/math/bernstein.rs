//! Cubic Bernstein basis polynomials.

/// Returns the four cubic Bernstein basis values `[B0, B1, B2, B3]` at `t`.
///
/// `B0 = (1-t)^3`, `B1 = 3(1-t)^2 t`, `B2 = 3(1-t) t^2`, `B3 = t^3`.
/// Any real `t` is accepted; outside `[0, 1]` the values extrapolate.
#[must_use]
pub fn cubic_basis(t: f64) -> [f64; 4] {
    let mt = 1.0 - t;
    [
        mt * mt * mt,
        3.0 * mt * mt * t,
        3.0 * mt * t * t,
        t * t * t,
    ]
}

/// Returns the quadratic Bernstein basis values `[B0, B1, B2]` at `t`,
/// the basis of a cubic's first derivative.
#[must_use]
pub fn quadratic_basis(t: f64) -> [f64; 3] {
    let mt = 1.0 - t;
    [mt * mt, 2.0 * mt * t, t * t]
}
