//! Spherical Web-Mercator projection onto the unit square.
//!
//! All clustering math runs in world coordinates: longitude/latitude mapped
//! to `[0, 1]` so that a pixel radius divided by `tile_extent * 2^zoom`
//! gives a zoom-consistent merge distance everywhere on the map. Latitudes
//! at the poles clamp to the square's edge instead of diverging.

use std::f64::consts::PI;

/// Project longitude in degrees to world x in `[0, 1]`.
#[inline]
pub fn lng_to_x(lng: f64) -> f64 {
    lng / 360.0 + 0.5
}

/// Project latitude in degrees to world y in `[0, 1]`.
#[inline]
pub fn lat_to_y(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let y = 0.5 - 0.25 * ((1.0 + sin) / (1.0 - sin)).ln() / PI;
    y.clamp(0.0, 1.0)
}

/// Inverse of [`lng_to_x`].
#[inline]
pub fn x_to_lng(x: f64) -> f64 {
    (x - 0.5) * 360.0
}

/// Inverse of [`lat_to_y`].
#[inline]
pub fn y_to_lat(y: f64) -> f64 {
    let y2 = (180.0 - y * 360.0) * PI / 180.0;
    360.0 * y2.exp().atan() / PI - 90.0
}
