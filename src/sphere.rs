//! Spherical rotation: composing an image's (yaw, pitch) orientation onto
//! projected angular coordinates.
//!
//! Points are taken through unit-sphere Cartesian coordinates with the
//! convention
//!
//! ```text
//! x = cos(yaw)·cos(pitch),   y = sin(pitch),   z = sin(yaw)·cos(pitch)
//! ```
//!
//! so `x` points at (0°, 0°), `y` at the zenith, and `z` at (90°, 0°).
//!
//! The composition order is fixed: pitch first, about the axis the yaw
//! rotation leaves in place (rotating the x/y plane), then yaw about the
//! vertical (rotating the x/z plane). This is what makes an image's stored
//! orientation read as "tilt up by pitch, then turn to yaw"; reversing the
//! order produces a different orientation and must not be done.

use crate::{Angular, Vector3};

/// Rotate angular points by an image's (yaw°, pitch°) orientation.
pub fn rotate_sphere(points: &[Angular], yaw_deg: f64, pitch_deg: f64) -> Vec<Angular> {
    let (sin_pitch, cos_pitch) = pitch_deg.to_radians().sin_cos();
    let (sin_yaw, cos_yaw) = yaw_deg.to_radians().sin_cos();
    points
        .iter()
        .map(|point| {
            let v = to_cartesian(point);
            // Pitch: rotate the x/y plane, z fixed.
            let tilted = Vector3::new(
                v.x * cos_pitch - v.y * sin_pitch,
                v.x * sin_pitch + v.y * cos_pitch,
                v.z,
            );
            // Yaw: rotate the x/z plane about the vertical, y fixed.
            let turned = Vector3::new(
                tilted.x * cos_yaw - tilted.z * sin_yaw,
                tilted.y,
                tilted.x * sin_yaw + tilted.z * cos_yaw,
            );
            to_angular(&turned)
        })
        .collect()
}

fn to_cartesian(point: &Angular) -> Vector3 {
    let (sin_yaw, cos_yaw) = point.yaw.to_radians().sin_cos();
    let (sin_pitch, cos_pitch) = point.pitch.to_radians().sin_cos();
    Vector3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch)
}

/// Convert a unit-sphere Cartesian point back to (yaw°, pitch°).
///
/// `asin` arguments are clamped to [-1, 1] against floating-point drift.
/// At the poles yaw is undefined; 0 is the chosen convention. The pole test
/// is `|y| >= 1` after clamping: `cos(asin(1.0))` is ~6e-17 in f64, never
/// exactly zero, so comparing the cosine against zero would let the residual
/// `z / cos(pitch)` reconstruct a yaw for a point sitting exactly on the
/// vertical axis. Elsewhere the ±90° principal value of `asin` is corrected
/// to the full ±180° range using the sign of `cos(yaw) = x / cos(pitch)`.
fn to_angular(v: &Vector3) -> Angular {
    let sin_pitch = v.y.clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();
    if sin_pitch.abs() >= 1.0 {
        return Angular::new(0.0, pitch.to_degrees());
    }
    let cos_pitch = pitch.cos();
    let sin_yaw = (v.z / cos_pitch).clamp(-1.0, 1.0);
    let mut yaw = sin_yaw.asin().to_degrees();
    if v.x / cos_pitch < 0.0 {
        yaw = if sin_yaw >= 0.0 {
            180.0 - yaw
        } else {
            -180.0 - yaw
        };
    }
    Angular::new(yaw, pitch.to_degrees())
}
