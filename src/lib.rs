//! # panolayout
//!
//! Geometry core for visualizing the layout of a multi-image panorama.
//!
//! Given a set of source images placed on a sphere — each with a yaw/pitch/roll
//! orientation, a horizontal field of view, and a radial lens-distortion model —
//! this crate computes each image's projected outline in panorama angular
//! coordinates, suitable for drawing onto an equirectangular layout chart.
//!
//! ## Pipeline
//!
//! An image outline is a rectangle perimeter in pixel space (origin at the image
//! center) threaded through four pure stages:
//!
//! ```text
//! perimeter → distortion correction → roll rotation → rectilinear projection
//!           → spherical (yaw, pitch) rotation → outline in (yaw°, pitch°)
//! ```
//!
//! Each stage is a pure function over a sequence of points; no stage retains
//! state across images. The only shared structure is the distortion
//! [`CorrectionTable`], built once per distinct `(a, b, c)` coefficient triple
//! and safe to reuse read-only across images with identical lens parameters.
//!
//! ## Example
//!
//! ```
//! use panolayout::{compute_outline, wrap_edge, PanoScript, DEFAULT_SEGMENTS_PER_EDGE};
//!
//! let script = PanoScript::parse(
//!     "p w8000 h4000 v360 S500,7500,200,3800\n\
//!      i w4000 h3000 v70 r0 y0 p0 a0 b0 c0 n\"left.jpg\"\n\
//!      i w4000 h3000 v=0 r0 y45 p10 a=0 b=0 c=0 n\"right.jpg\"\n",
//! )?;
//!
//! for image in &script.images {
//!     let outline = compute_outline(image, DEFAULT_SEGMENTS_PER_EDGE);
//!     for pair in outline.windows(2) {
//!         if wrap_edge(&pair[0], &pair[1]) {
//!             continue; // edge crosses the ±180° seam, do not draw it
//!         }
//!         // draw pair[0] → pair[1] on the chart
//!     }
//! }
//! # anyhow::Ok(())
//! ```
//!
//! ## Conventions
//!
//! - **Pixel space**: origin at the image center, +X right, +Y down, units of
//!   pixels. The lens-correction radius unit is half of the shorter image
//!   dimension (normalized radius 1.0 at the short-axis edge).
//! - **Angular space**: yaw° (horizontal, wraps at ±180°) and pitch° (vertical,
//!   ±90°). The pipeline does not wrap values itself; consumers handle the
//!   ±180° seam via [`wrap_edge`].
//!
//! Out of scope: rasterization of grids and outlines, non-equirectangular
//! output projections, and lens shift/shear correction.

pub mod descriptor;
pub mod distortion;
pub mod outline;
pub mod planar;
pub mod projection;
pub mod sphere;

pub use descriptor::{CropRect, ImageDescriptor, PanoDescriptor, PanoScript};
pub use distortion::{CorrectionTable, LensPolynomial};
pub use outline::{
    compute_outline, compute_outline_with_table, rectangle_perimeter, wrap_edge,
    DEFAULT_SEGMENTS_PER_EDGE,
};
pub use projection::project_rectilinear;
pub use sphere::rotate_sphere;

// Commonly used types. All geometry is f64: outlines are inspected at
// sub-degree scale and the sampled distortion inverse already contributes
// millidegree-level error, so there is no headroom for f32.
pub type Point2 = nalgebra::Point2<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;

/// Angular position on the panorama sphere, in degrees.
///
/// `yaw` is the horizontal position (wraps at ±180°), `pitch` the vertical
/// (±90°). Values produced by the pipeline stay within those ranges by
/// construction of the spherical conversion; they are not re-wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angular {
    /// Horizontal angular position, degrees.
    pub yaw: f64,
    /// Vertical angular position, degrees.
    pub pitch: f64,
}

impl Angular {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }
}
