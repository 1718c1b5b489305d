//! Tilt-compensated compass heading

use libm::{atan2f, cosf, sinf};
use nalgebra::Vector3;

use crate::navigation::geo::wrap_360;
use crate::traits::Attitude;

/// Heading in degrees [0, 360) from hull attitude and magnetometer axes
///
/// Returns `None` for non-finite inputs or a zero horizontal field.
pub fn tilt_compensated_heading(
    attitude: &Attitude,
    field: &Vector3<f32>,
    offset_deg: f32,
) -> Option<f32> {
    if !attitude.is_finite() || !field.iter().all(|v| v.is_finite()) {
        return None;
    }

    let xh = field.x * cosf(attitude.roll) + field.z * sinf(attitude.roll);
    let yh = field.y * cosf(attitude.pitch) + field.z * sinf(attitude.pitch);
    if xh == 0.0 && yh == 0.0 {
        return None;
    }

    let raw = wrap_360(atan2f(xh, yh).to_degrees());
    // Sensor axes turn the opposite way to the compass rose
    let heading = wrap_360(360.0 - raw + offset_deg);
    heading.is_finite().then_some(heading)
}
