//! In-plane transforms over pixel-space point sets.
//!
//! Rotation is about the origin, which the pipeline places at the image
//! center; there is no principal-point shift in the model. Rotation preserves
//! each point's radial distance, which the distortion stage relies on since
//! lens correction operates on the same pixel-space radius.

use crate::{Point2, Vector2};
use nalgebra::Rotation2;

/// Rotate a point set counterclockwise about the origin.
pub fn rotate(points: &[Point2], degrees_ccw: f64) -> Vec<Point2> {
    let rotation = Rotation2::new(degrees_ccw.to_radians());
    points.iter().map(|p| rotation * p).collect()
}

/// Shift a point set by `(dx, dy)`.
///
/// Used when composing outlines onto a canvas; not part of the angular
/// pipeline itself.
pub fn translate(points: &[Point2], dx: f64, dy: f64) -> Vec<Point2> {
    let shift = Vector2::new(dx, dy);
    points.iter().map(|p| p + shift).collect()
}
