//! Rectilinear pixel → angle projection.
//!
//! Models the source image as a rectilinear (pinhole) lens: the image plane
//! sits at the focal distance `d = w / (2·tan(fov/2))` in front of the sphere
//! center, and each pixel offset maps to the angle subtended at the center.
//! This is the only lens family supported; fisheye sources are out of scope.

use crate::{Angular, Point2};
use std::f64::consts::PI;

/// Project corrected, rolled pixel-space points to (yaw°, pitch°).
///
/// `fov_deg` is the horizontal field of view across `width` pixels. The
/// signature deliberately takes no image height: the vertical extent follows
/// from the same focal distance, so height never enters the formulas and a
/// parameter for it would be dead weight. Yaw is measured in the horizontal
/// plane, pitch from the horizon along the great circle through the point's
/// yaw meridian.
pub fn project_rectilinear(points: &[Point2], fov_deg: f64, width: f64) -> Vec<Angular> {
    let focal = width / (2.0 * (PI * fov_deg / 360.0).tan());
    points
        .iter()
        .map(|p| Angular {
            yaw: (p.x / focal).atan().to_degrees(),
            pitch: (p.y / (focal * focal + p.x * p.x).sqrt()).atan().to_degrees(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_origin() {
        let out = project_rectilinear(&[Point2::new(0.0, 0.0)], 70.0, 4000.0);
        assert_eq!(out[0].yaw, 0.0);
        assert_eq!(out[0].pitch, 0.0);
    }

    #[test]
    fn test_horizontal_edge_maps_to_half_fov() {
        // The edge-midpoint pixel at x = ±w/2 subtends exactly half the FOV.
        for fov in [30.0, 70.0, 120.0] {
            let out = project_rectilinear(
                &[Point2::new(2000.0, 0.0), Point2::new(-2000.0, 0.0)],
                fov,
                4000.0,
            );
            assert!(
                (out[0].yaw - fov / 2.0).abs() < 1e-9,
                "fov {fov}: expected yaw {}, got {}",
                fov / 2.0,
                out[0].yaw
            );
            assert!((out[1].yaw + fov / 2.0).abs() < 1e-9);
            assert_eq!(out[0].pitch, 0.0);
        }
    }

    #[test]
    fn test_vertical_pitch_on_meridian() {
        // On the x = 0 meridian, pitch is atan(y / d).
        let fov = 90.0_f64;
        let width = 1000.0;
        let focal = width / 2.0; // tan(45°) = 1
        let out = project_rectilinear(&[Point2::new(0.0, 300.0)], fov, width);
        let expected = (300.0 / focal).atan().to_degrees();
        assert!((out[0].pitch - expected).abs() < 1e-9);
        assert_eq!(out[0].yaw, 0.0);
    }

    #[test]
    fn test_corner_pitch_shrinks_with_x() {
        // At fixed y, pitch decreases as |x| grows: the corner sits farther
        // from the sphere center than the edge midpoint.
        let out = project_rectilinear(
            &[Point2::new(0.0, 500.0), Point2::new(1500.0, 500.0)],
            70.0,
            4000.0,
        );
        assert!(out[1].pitch < out[0].pitch);
        assert!(out[1].pitch > 0.0);
    }
}
