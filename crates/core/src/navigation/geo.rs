//! Angle and geographic calculations for navigation
//!
//! Pure functions on compass angles (degrees) and GPS coordinates:
//! normalization, signed differences, side/arc tests on the compass circle,
//! and great-circle bearing/distance between two positions.

use libm::{asin, atan2, cos, sin, sqrt};

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Normalize an angle into [0, 360)
pub fn wrap_360(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    let wrapped = if wrapped < 0.0 { wrapped + 360.0 } else { wrapped };
    // -1e-6 % 360 + 360 rounds to exactly 360.0 in f32
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize an angle into (-180, 180]
pub fn wrap_180(angle: f32) -> f32 {
    let wrapped = wrap_360(angle);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation carrying bearing `a` onto bearing `b`, in (-180, 180].
///
/// Positive when `b` lies clockwise of `a`, so `angular_diff(heading, target)`
/// is a heading error where positive means "turn right".
pub fn angular_diff(a: f32, b: f32) -> f32 {
    wrap_180(b - a)
}

/// True when `a` lies counter-clockwise ("to the left") of `b` by less than 180°.
///
/// Equivalently, the short rotation from `a` to `b` is clockwise.
pub fn is_left_of(a: f32, b: f32) -> bool {
    wrap_360(a - b) > 180.0
}

/// True when `x` lies strictly inside the clockwise arc going from `a` to `b`.
///
/// Handles arcs that wrap through north (e.g. `a = 350`, `b = 10`).
/// The arc from a bearing to itself is empty.
pub fn is_between(x: f32, a: f32, b: f32) -> bool {
    let (x, a, b) = (wrap_360(x), wrap_360(a), wrap_360(b));
    if a == b {
        false
    } else if a < b {
        x > a && x < b
    } else {
        x > a || x < b
    }
}

/// Great-circle initial bearing from point 1 to point 2, degrees in [0, 360)
pub fn calculate_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f32 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = sin(delta_lon) * cos(lat2_rad);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);
    let bearing = atan2(y, x).to_degrees();

    wrap_360(bearing as f32)
}

/// Haversine distance between two points in meters
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f32 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));

    (EARTH_RADIUS_M * c) as f32
}

/// Destination reached by travelling `distance_m` from a point along `bearing_deg`
///
/// Returns `(latitude, longitude)` in degrees.
pub fn offset_position(lat: f64, lon: f64, distance_m: f32, bearing_deg: f32) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let lon_rad = lon.to_radians();
    let bearing_rad = (bearing_deg as f64).to_radians();
    let angular = distance_m as f64 / EARTH_RADIUS_M;

    let lat2 = asin(sin(lat_rad) * cos(angular) + cos(lat_rad) * sin(angular) * cos(bearing_rad));
    let lon2 = lon_rad
        + atan2(
            sin(bearing_rad) * sin(angular) * cos(lat_rad),
            cos(angular) - sin(lat_rad) * sin(lat2),
        );

    (lat2.to_degrees(), lon2.to_degrees())
}
