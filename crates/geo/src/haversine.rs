//! Haversine distance and initial bearing.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Bearings follow the same
//! spherical model: degrees clockwise from true north.

use crate::{normalize_angle, Coordinate};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in kilometers.
///
/// Uses the Haversine formula for accurate distance calculation on a sphere.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in kilometers
///
/// # Example
/// ```
/// use sitelocator_geo::{haversine_distance, Coordinate};
///
/// let berlin = Coordinate::new(52.5200, 13.4050);
/// let paris = Coordinate::new(48.8566, 2.3522);
///
/// let distance = haversine_distance(&berlin, &paris);
/// assert!((distance - 878.0).abs() < 10.0);
/// ```
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

/// Calculates the great-circle distance between two coordinates in meters.
///
/// # Arguments
/// * `from` - Starting coordinate
/// * `to` - Ending coordinate
///
/// # Returns
/// Distance in meters
#[inline]
pub fn haversine_distance_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_M)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` just past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

/// Initial great-circle bearing from `from` to `to`.
///
/// # Arguments
/// * `from` - Observer coordinate
/// * `to` - Target coordinate
///
/// # Returns
/// Degrees in `[0, 360)`, 0 = north, clockwise. Coincident points have a
/// bearing of 0.
///
/// # Example
/// ```
/// use sitelocator_geo::{bearing, Coordinate};
///
/// let origin = Coordinate::new(0.0, 0.0);
/// let east = Coordinate::new(0.0, 1.0);
/// assert!((bearing(&origin, &east) - 90.0).abs() < 1e-9);
/// ```
pub fn bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    if from == to {
        return 0.0;
    }

    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();
    let d_lon = lon2 - lon1;

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    if y == 0.0 && x == 0.0 {
        return 0.0;
    }

    normalize_angle(y.atan2(x).to_degrees())
}
