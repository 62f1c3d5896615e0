//! Panorama script descriptors: `i` (image) and `p` (panorama) lines.
//!
//! The script format is line-oriented and whitespace-tokenized. Each token
//! carries a single-letter key prefix (`w4000`, `y12.5`, `n"img.jpg"`,
//! `S0,8000,0,4000`); tokens with unrecognized prefixes are skipped, so only
//! the fields the geometry pipeline needs are extracted.
//!
//! The lens fields `v`, `a`, `b`, `c` support a back-reference form `v=N`,
//! meaning "same value as image number N". References resolve against the
//! subsequence of already-parsed images, so only earlier images can be
//! referenced; forward and self references are rejected.
//!
//! Parsing fails fast: the first malformed field aborts the load with an error
//! naming the offending raw line. There is no partial recovery.

use anyhow::{bail, Context, Result};
use tracing::debug;

/// One source image placed on the panorama sphere.
///
/// All back-references are resolved at parse time; consumers always see
/// literal values.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// In-plane rotation about the image center, degrees.
    pub roll: f64,
    /// Horizontal position on the panorama sphere, degrees.
    pub yaw: f64,
    /// Vertical position on the panorama sphere, degrees.
    pub pitch: f64,
    /// Horizontal field of view, degrees. Always > 0.
    pub fov: f64,
    /// Radial distortion coefficient (cubic term).
    pub a: f64,
    /// Radial distortion coefficient (quadratic term).
    pub b: f64,
    /// Radial distortion coefficient (linear term).
    pub c: f64,
    /// Source image name, when the line carries an `n"..."` token.
    pub name: Option<String>,
}

impl ImageDescriptor {
    /// Parse an `i` line. `previous` is the ordered collection of
    /// already-parsed images that `field=N` back-references resolve against.
    pub fn parse(line: &str, previous: &[ImageDescriptor]) -> Result<Self> {
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut fov: Option<f64> = None;
        let mut roll = 0.0;
        let mut yaw = 0.0;
        let mut pitch = 0.0;
        let mut a = 0.0;
        let mut b = 0.0;
        let mut c = 0.0;
        let mut name = None;

        for token in line.split_whitespace().skip(1) {
            let mut chars = token.chars();
            let Some(key) = chars.next() else { continue };
            let rest = chars.as_str();
            match key {
                'w' => width = Some(parse_dimension(rest, token, line)?),
                'h' => height = Some(parse_dimension(rest, token, line)?),
                'r' => roll = parse_number(rest, token, line)?,
                'y' => yaw = parse_number(rest, token, line)?,
                'p' => pitch = parse_number(rest, token, line)?,
                'v' => fov = Some(parse_lens_field(rest, token, line, previous, |i| i.fov)?),
                'a' => a = parse_lens_field(rest, token, line, previous, |i| i.a)?,
                'b' => b = parse_lens_field(rest, token, line, previous, |i| i.b)?,
                'c' => c = parse_lens_field(rest, token, line, previous, |i| i.c)?,
                'n' if rest.len() >= 2 && rest.starts_with('"') && rest.ends_with('"') => {
                    name = Some(rest[1..rest.len() - 1].to_string());
                }
                _ => {} // unrecognized field, skip
            }
        }

        let width = width.with_context(|| format!("missing image width in line '{line}'"))?;
        let height = height.with_context(|| format!("missing image height in line '{line}'"))?;
        let fov = fov.with_context(|| format!("missing field of view in line '{line}'"))?;
        if fov <= 0.0 {
            bail!("field of view must be positive, got {fov} in line '{line}'");
        }

        let image = Self {
            width,
            height,
            roll,
            yaw,
            pitch,
            fov,
            a,
            b,
            c,
            name,
        };
        debug!(?image, "parsed image line");
        Ok(image)
    }

    /// Total pixel count of the source image.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Crop rectangle in output-panorama pixels. `x1 < x2 <= width`,
/// `y1 < y2 <= height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x1: u32,
    pub x2: u32,
    pub y1: u32,
    pub y2: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// The equirectangular output panorama.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoDescriptor {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Horizontal field of view, degrees. Always > 0.
    pub fov: f64,
    /// Crop rectangle; the full frame when the line has no `S` token.
    pub crop: CropRect,
}

impl PanoDescriptor {
    /// Parse a `p` line.
    pub fn parse(line: &str) -> Result<Self> {
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;
        let mut fov: Option<f64> = None;
        let mut crop: Option<CropRect> = None;

        for token in line.split_whitespace().skip(1) {
            let mut chars = token.chars();
            let Some(key) = chars.next() else { continue };
            let rest = chars.as_str();
            match key {
                'w' => width = Some(parse_dimension(rest, token, line)?),
                'h' => height = Some(parse_dimension(rest, token, line)?),
                'v' => fov = Some(parse_number(rest, token, line)?),
                'S' => crop = Some(parse_crop(rest, line)?),
                _ => {}
            }
        }

        let width = width.with_context(|| format!("missing panorama width in line '{line}'"))?;
        let height = height.with_context(|| format!("missing panorama height in line '{line}'"))?;
        let fov = fov.with_context(|| format!("missing panorama field of view in line '{line}'"))?;
        if fov <= 0.0 {
            bail!("panorama field of view must be positive, got {fov} in line '{line}'");
        }

        let crop = crop.unwrap_or(CropRect {
            x1: 0,
            x2: width,
            y1: 0,
            y2: height,
        });
        if crop.x1 >= crop.x2 || crop.x2 > width || crop.y1 >= crop.y2 || crop.y2 > height {
            bail!("crop rectangle {crop:?} out of bounds for {width}x{height} in line '{line}'");
        }

        let pano = Self {
            width,
            height,
            fov,
            crop,
        };
        debug!(?pano, "parsed panorama line");
        Ok(pano)
    }

    /// Vertical field of view, degrees: `v * h / w`.
    ///
    /// This is a flat, linear approximation of the vertical angular extent,
    /// not a spherically correct derivation. It is preserved as-is for
    /// compatibility with existing script files.
    pub fn fov_vertical(&self) -> f64 {
        self.fov * f64::from(self.height) / f64::from(self.width)
    }

    /// Pixel count of the cropped output area.
    pub fn cropped_pixel_count(&self) -> u64 {
        u64::from(self.crop.width()) * u64::from(self.crop.height())
    }
}

/// A parsed panorama script: the image lines in file order plus the `p` line.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoScript {
    pub images: Vec<ImageDescriptor>,
    pub pano: PanoDescriptor,
}

impl PanoScript {
    /// Parse a whole script from text. Blank lines, comments, and lines other
    /// than `i`/`p` are skipped.
    pub fn parse(source: &str) -> Result<Self> {
        let mut images = Vec::new();
        let mut pano = None;

        for line in source.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('i') {
                let image = ImageDescriptor::parse(line, &images)?;
                images.push(image);
            } else if line.starts_with('p') {
                pano = Some(PanoDescriptor::parse(line)?);
            }
        }

        let pano = pano.context("script has no panorama ('p') line")?;
        debug!(num_images = images.len(), "parsed panorama script");
        Ok(Self { images, pano })
    }

    /// Load and parse a script file.
    pub fn load(path: &str) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read panorama script '{path}'"))?;
        Self::parse(&source).with_context(|| format!("failed to parse panorama script '{path}'"))
    }

    /// Total pixel count across all source images.
    pub fn source_pixel_count(&self) -> u64 {
        self.images.iter().map(ImageDescriptor::pixel_count).sum()
    }
}

fn parse_number(value: &str, token: &str, line: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("non-numeric field '{token}' in line '{line}'"))
}

fn parse_dimension(value: &str, token: &str, line: &str) -> Result<u32> {
    let v: u32 = value
        .parse()
        .with_context(|| format!("non-numeric field '{token}' in line '{line}'"))?;
    if v == 0 {
        bail!("dimension must be positive in field '{token}' in line '{line}'");
    }
    Ok(v)
}

/// Parse a lens field that is either a literal number or a `=N` back-reference
/// into the already-parsed images.
fn parse_lens_field(
    value: &str,
    token: &str,
    line: &str,
    previous: &[ImageDescriptor],
    pick: impl Fn(&ImageDescriptor) -> f64,
) -> Result<f64> {
    match value.strip_prefix('=') {
        Some(index) => {
            let index: usize = index
                .parse()
                .with_context(|| format!("malformed back-reference '{token}' in line '{line}'"))?;
            let referenced = previous.get(index).with_context(|| {
                format!(
                    "back-reference '{token}' in line '{line}' points past the \
                     {} image(s) parsed so far",
                    previous.len()
                )
            })?;
            Ok(pick(referenced))
        }
        None => parse_number(value, token, line),
    }
}

fn parse_crop(value: &str, line: &str) -> Result<CropRect> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 4 {
        bail!(
            "expected 4 comma-separated crop values, got {} in line '{line}'",
            parts.len()
        );
    }
    let mut bounds = [0u32; 4];
    for (slot, part) in bounds.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("non-numeric crop value '{part}' in line '{line}'"))?;
    }
    Ok(CropRect {
        x1: bounds[0],
        x2: bounds[1],
        y1: bounds[2],
        y2: bounds[3],
    })
}
