//! Raster codec built on the `image` crate, with `webp` for lossy WebP output.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, GIF, WebP, BMP, TIFF) | `image::ImageReader::decode`, first frame for GIF |
//! | Scale | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Cover crop | centered `DynamicImage::crop_imm` in source space, then `resize_exact` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality`, alpha flattened onto white |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (best compression, adaptive filter) |
//! | Encode → WebP | `webp::Encoder::from_rgba` (lossy, at the requested quality) |
//!
//! Cover crop cuts the window out of the source before scaling, so the
//! intermediate surface is never larger than the source or the target box.

use super::backend::{BackendError, Decoded, Dimensions, RasterCodec};
use super::calculations::cover_crop_window;
use super::params::{DrawMode, DrawParams, OutputFormat, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::io::Cursor;

/// Production codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Sniff the MIME type of encoded bytes from their magic header.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

fn reader(bytes: &[u8]) -> std::io::Result<ImageReader<Cursor<&[u8]>>> {
    ImageReader::new(Cursor::new(bytes)).with_guessed_format()
}

fn dimensions_of(img: &DynamicImage) -> Dimensions {
    Dimensions::new(img.width(), img.height())
}

/// Composite onto a white background for encoders that cannot carry alpha.
///
/// Opaque images are converted directly.
fn flatten_on_white(img: &DynamicImage) -> DynamicImage {
    if !img.color().has_alpha() {
        return to_rgb(img);
    }
    let rgba = img.to_rgba8();
    let flat = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    });
    DynamicImage::ImageRgb8(flat)
}

fn to_rgb(img: &DynamicImage) -> DynamicImage {
    DynamicImage::ImageRgb8(img.to_rgb8())
}

/// Narrow to 8-bit RGB/RGBA, which every encoder here accepts.
fn to_rgb_or_rgba(img: &DynamicImage) -> DynamicImage {
    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        to_rgb(img)
    }
}

/// Lossy WebP at `quality`, keeping alpha.
fn encode_webp(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    webp::Encoder::from_rgba(&rgba, width, height)
        .encode_simple(false, quality.value() as f32)
        .map(|memory| memory.to_vec())
        .map_err(|e| BackendError::Encode(format!("WebP: {e:?}")))
}

impl RasterCodec for RustCodec {
    type Surface = DynamicImage;

    fn probe(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(bytes)
            .map_err(|e| BackendError::Probe(e.to_string()))?
            .into_dimensions()
            .map_err(|e| BackendError::Probe(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, bytes: &[u8]) -> Result<Decoded<DynamicImage>, BackendError> {
        let img = reader(bytes)
            .map_err(|e| BackendError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Decoded {
            dimensions: dimensions_of(&img),
            surface: img,
        })
    }

    fn draw_scaled(
        &self,
        surface: &DynamicImage,
        params: &DrawParams,
    ) -> Result<Decoded<DynamicImage>, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::Draw(format!(
                "empty target box {}x{}",
                params.width, params.height
            )));
        }

        let drawn = match params.mode {
            DrawMode::Scale => surface.resize_exact(params.width, params.height, FilterType::Lanczos3),
            DrawMode::Cover => {
                let (x, y, w, h) = cover_crop_window(
                    (surface.width(), surface.height()),
                    (params.width, params.height),
                );
                surface
                    .crop_imm(x, y, w, h)
                    .resize_exact(params.width, params.height, FilterType::Lanczos3)
            }
        };

        Ok(Decoded {
            dimensions: dimensions_of(&drawn),
            surface: drawn,
        })
    }

    fn encode(
        &self,
        surface: &DynamicImage,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let mut buf = Vec::new();
        let result = match format {
            OutputFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
                flatten_on_white(surface).write_with_encoder(encoder)
            }
            OutputFormat::Png => {
                let encoder =
                    PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
                to_rgb_or_rgba(surface).write_with_encoder(encoder)
            }
            OutputFormat::WebP => return encode_webp(surface, quality),
        };
        result.map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
        Ok(buf)
    }
}
