//! Outline pipeline: a source image's projected outline on the panorama
//! sphere.
//!
//! The perimeter of the image rectangle is sampled in pixel space and
//! threaded through the four stages in fixed order: distortion correction,
//! roll rotation, rectilinear projection, spherical rotation. The result is
//! a closed polygon in (yaw°, pitch°), traversed clockwise; adjacency of
//! consecutive points is meaningful, since the renderer suppresses edges
//! that cross the ±180° seam via [`wrap_edge`].

use crate::descriptor::ImageDescriptor;
use crate::distortion::{CorrectionTable, LensPolynomial};
use crate::{planar, projection, sphere, Angular, Point2};

/// Perimeter sampling density used by the layout chart.
pub const DEFAULT_SEGMENTS_PER_EDGE: usize = 50;

/// Sample the perimeter of a zero-centered `width` × `height` rectangle.
///
/// Each edge contributes `segments_per_edge` equally spaced points, start
/// point included and end point excluded, traversed clockwise from the
/// top-left corner (+Y down). No corner appears twice; the closing edge back
/// to the first point is implicit.
pub fn rectangle_perimeter(width: f64, height: f64, segments_per_edge: usize) -> Vec<Point2> {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    let corners = [
        Point2::new(-half_w, -half_h),
        Point2::new(half_w, -half_h),
        Point2::new(half_w, half_h),
        Point2::new(-half_w, half_h),
    ];
    let mut points = Vec::with_capacity(4 * segments_per_edge);
    for i in 0..4 {
        let start = corners[i];
        let end = corners[(i + 1) % 4];
        for k in 0..segments_per_edge {
            let t = k as f64 / segments_per_edge as f64;
            points.push(Point2::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            ));
        }
    }
    points
}

/// Compute an image's outline in panorama angular coordinates.
///
/// Builds the distortion table for the image's own `(a, b, c)` triple. When
/// several images share lens parameters, build one [`CorrectionTable`] and
/// use [`compute_outline_with_table`] instead.
pub fn compute_outline(image: &ImageDescriptor, segments_per_edge: usize) -> Vec<Angular> {
    let width = f64::from(image.width);
    let height = f64::from(image.height);
    let unit_radius = width.min(height) / 2.0;
    let corner_radius = (width * width + height * height).sqrt() / (2.0 * unit_radius);
    let lens = LensPolynomial::new(image.a, image.b, image.c);
    let table = CorrectionTable::build(&lens, corner_radius);
    compute_outline_with_table(image, &table, segments_per_edge)
}

/// [`compute_outline`] with a caller-provided distortion table.
///
/// The table must have been built for this image's `(a, b, c)` coefficients
/// and a maximum radius covering the image corners.
pub fn compute_outline_with_table(
    image: &ImageDescriptor,
    table: &CorrectionTable,
    segments_per_edge: usize,
) -> Vec<Angular> {
    let width = f64::from(image.width);
    let height = f64::from(image.height);
    let unit_radius = width.min(height) / 2.0;

    let perimeter = rectangle_perimeter(width, height, segments_per_edge);
    let corrected = table.correct(&perimeter, unit_radius);
    let rolled = planar::rotate(&corrected, image.roll);
    let projected = projection::project_rectilinear(&rolled, image.fov, width);
    sphere::rotate_sphere(&projected, image.yaw, image.pitch)
}

/// Whether the outline edge between two consecutive points crosses the ±180°
/// seam and must not be drawn as a direct line.
pub fn wrap_edge(a: &Angular, b: &Angular) -> bool {
    (a.yaw - b.yaw).abs() >= 180.0
}
