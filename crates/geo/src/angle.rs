//! Compass angle arithmetic.

use crate::{bearing, Coordinate};

/// Normalizes an angle in degrees to `[0, 360)`.
///
/// An exact 360 maps to 0. Non-finite input yields 0.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let normalized = angle.rem_euclid(360.0);
    // `-1e-17 + 360.0` rounds to 360.0
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Shortest angular distance between two compass angles, in `[0, 180]`.
#[inline]
pub fn angular_deviation(a: f64, b: f64) -> f64 {
    let diff = (normalize_angle(a) - normalize_angle(b)).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Interior angle at `vertex` formed by its two ring neighbours, in `[0, 180]`.
///
/// Measured as the wrapped difference between the bearing towards `prev` and
/// the bearing towards `next`.
#[inline]
pub fn turning_angle(prev: &Coordinate, vertex: &Coordinate, next: &Coordinate) -> f64 {
    angular_deviation(bearing(vertex, prev), bearing(vertex, next))
}
