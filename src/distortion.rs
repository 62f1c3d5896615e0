//! Radial lens distortion: sampled inversion of the a/b/c polynomial model.
//!
//! The lens model maps a corrected (ideal rectilinear) radius `r` to the
//! radius observed in the image:
//!
//! ```text
//! r_image = r × (a·r³ + b·r² + c·r + d),   d = 1 − a − b − c
//! ```
//!
//! Radii are normalized so that 1.0 falls at the image's short-axis edge
//! (the radius unit is half of the shorter image dimension). The choice of
//! `d` makes the model pass through (1, 1) by construction.
//!
//! Undistorting a point needs the inverse mapping, observed → corrected.
//! Rather than inverting the quartic analytically, the polynomial is sampled
//! once at a fine corrected-radius step into a monotonic lookup table keyed by
//! quantized image radius. The outline pipeline tolerates the resulting few
//! millidegrees of approximation error; this is an accepted trade, not a
//! production-accuracy inverse.

use crate::Point2;
use tracing::debug;

/// Corrected-radius sampling step, which is also the image-radius bucket
/// width of the finished table.
const RADIUS_STEP: f64 = 0.001;

/// Corrected-radius cutoff guarding against runaway or degenerate
/// polynomials that never reach the target image radius.
const MAX_CORRECTED_RADIUS: f64 = 3.0;

/// Sampling continues until the image radius exceeds the maximum expected
/// normalized radius by this margin.
const RADIUS_MARGIN: f64 = 1.1;

/// Radial distortion polynomial with coefficients `a`, `b`, `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensPolynomial {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl LensPolynomial {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// The derived constant term `d = 1 − a − b − c`.
    pub fn d(&self) -> f64 {
        1.0 - self.a - self.b - self.c
    }

    /// Image radius observed for a corrected radius, both normalized.
    pub fn image_radius(&self, corrected: f64) -> f64 {
        let r = corrected;
        r * (self.a * r * r * r + self.b * r * r + self.c * r + self.d())
    }

    /// Returns `true` when all coefficients are zero (the identity lens).
    pub fn is_identity(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }
}

/// Sampled inverse of a [`LensPolynomial`]: quantized normalized image radius
/// → corrected radius.
///
/// Built once per distinct coefficient triple and safe to share read-only
/// across images with identical lens parameters. Entries are non-decreasing
/// by construction: the table only ever records corrected radii in the order
/// they were sampled, holding the last value across any image-radius bucket
/// the polynomial skips.
#[derive(Debug, Clone)]
pub struct CorrectionTable {
    entries: Vec<f64>,
}

impl CorrectionTable {
    /// Sample `lens` from corrected radius 0 upward until the image radius
    /// passes `max_normalized_radius` with margin (or the corrected radius
    /// hits the runaway guard).
    ///
    /// `max_normalized_radius` is typically the image's corner radius,
    /// `sqrt(w² + h²) / min(w, h)`.
    pub fn build(lens: &LensPolynomial, max_normalized_radius: f64) -> Self {
        let cutoff = RADIUS_MARGIN * max_normalized_radius;
        let mut entries = Vec::new();
        let mut corrected = 0.0;
        loop {
            let image_radius = lens.image_radius(corrected);
            let bucket = bucket_index(image_radius);
            while entries.len() <= bucket {
                entries.push(corrected);
            }
            if image_radius > cutoff || corrected > MAX_CORRECTED_RADIUS {
                break;
            }
            corrected += RADIUS_STEP;
        }
        debug!(
            ?lens,
            entries = entries.len(),
            last_corrected = corrected,
            "built distortion correction table"
        );
        Self { entries }
    }

    /// Number of image-radius buckets in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Corrected radius for a normalized image radius, via nearest-lower
    /// bucket lookup. Image radii beyond the sampled range clamp to the last
    /// entry.
    pub fn corrected_radius(&self, normalized_image_radius: f64) -> f64 {
        let bucket = bucket_index(normalized_image_radius).min(self.entries.len() - 1);
        self.entries[bucket]
    }

    /// Undistort a pixel-space point set.
    ///
    /// `unit_radius` is half of the shorter image dimension (the pixel
    /// distance at which the normalized radius equals 1.0). Each point is
    /// scaled along its own ray so its radius moves from the observed to the
    /// corrected circle; the angle is preserved. A point exactly at the image
    /// center maps to itself.
    pub fn correct(&self, points: &[Point2], unit_radius: f64) -> Vec<Point2> {
        points
            .iter()
            .map(|p| {
                let radius = (p.x * p.x + p.y * p.y).sqrt() / unit_radius;
                if radius == 0.0 {
                    return *p;
                }
                let scale = self.corrected_radius(radius) / radius;
                Point2::new(p.x * scale, p.y * scale)
            })
            .collect()
    }
}

/// Quantize a normalized radius to its table bucket. Negative radii (possible
/// for degenerate coefficient sets at small r) saturate to bucket 0.
fn bucket_index(radius: f64) -> usize {
    (radius / RADIUS_STEP) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_lens_is_near_identity() {
        let lens = LensPolynomial::new(0.0, 0.0, 0.0);
        assert!(lens.is_identity());
        assert_eq!(lens.d(), 1.0);

        let table = CorrectionTable::build(&lens, 1.25);
        for &r in &[0.05, 0.2, 0.5, 0.9, 1.0, 1.2] {
            let corrected = table.corrected_radius(r);
            let ratio = corrected / r;
            assert!(
                (ratio - 1.0).abs() < 0.005,
                "identity lens should leave radius {r} unchanged, got {corrected}"
            );
        }
    }

    #[test]
    fn test_table_monotonic() {
        // Mild barrel/pincushion mix with d = 0.97 > 0.
        let lens = LensPolynomial::new(0.05, -0.1, 0.08);
        let table = CorrectionTable::build(&lens, 1.3);
        assert!(table.len() > 1000, "table should cover the sampled range");
        for pair in table.entries.windows(2) {
            assert!(
                pair[1] >= pair[0],
                "corrected radius must be non-decreasing: {} then {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_center_point_unchanged() {
        let lens = LensPolynomial::new(0.02, -0.05, 0.01);
        let table = CorrectionTable::build(&lens, 1.25);
        let corrected = table.correct(&[Point2::new(0.0, 0.0)], 1500.0);
        assert_eq!(corrected[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_correction_preserves_angle() {
        let lens = LensPolynomial::new(0.0, 0.0, 0.1);
        let table = CorrectionTable::build(&lens, 1.25);
        let input = Point2::new(600.0, -800.0);
        let out = table.correct(&[input], 1500.0);
        // x/y ratio unchanged: the point moved along its own ray.
        assert!(
            (out[0].x * input.y - out[0].y * input.x).abs() < 1e-9,
            "correction must preserve the point's direction, got {:?}",
            out[0]
        );
    }

    #[test]
    fn test_correction_matches_forward_model() {
        let lens = LensPolynomial::new(0.01, -0.03, 0.05);
        let table = CorrectionTable::build(&lens, 1.3);
        // Pick a corrected radius, push it through the forward model, then
        // invert via the table: should land near the original.
        for &r in &[0.1, 0.4, 0.8, 1.1] {
            let observed = lens.image_radius(r);
            let recovered = table.corrected_radius(observed);
            assert!(
                (recovered - r).abs() < 0.003,
                "inverse of forward at r={r}: expected ~{r}, got {recovered}"
            );
        }
    }

    #[test]
    fn test_out_of_range_radius_clamps() {
        let lens = LensPolynomial::new(0.0, 0.0, 0.0);
        let table = CorrectionTable::build(&lens, 1.0);
        let last = table.corrected_radius(100.0);
        assert_eq!(last, *table.entries.last().unwrap());
    }

    #[test]
    fn test_runaway_polynomial_terminates() {
        // d = 2: image radius initially grows at twice the corrected radius,
        // and the cubic term pulls it back down. The build must still stop.
        let lens = LensPolynomial::new(-1.0, 0.0, 0.0);
        let table = CorrectionTable::build(&lens, 1.25);
        assert!(!table.is_empty());
    }
}
