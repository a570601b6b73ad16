//! Static image compression: fit or cover-crop into a box, then re-encode.
//!
//! ## Decision Sequence
//!
//! ```text
//! size < skip threshold && dims within box  →  return input unchanged
//! decode
//! crop-to-fill  →  centered source crop at target aspect, scaled to exactly max_width × max_height
//! fit           →  scale down preserving aspect (skipped when already inside)
//! choose format (large PNG → JPEG, otherwise keep declared format)
//! encode at the configured quality
//! ```
//!
//! Errors come back as [`BackendError`]; the caller wraps them with the
//! purpose so the user sees purpose-specific text.

use crate::config::ConversionConfig;
use crate::imaging::{
    BackendError, DrawMode, DrawParams, Dimensions, OutputFormat, Quality, RasterCodec,
    calculate_fit_dimensions, fits_within,
};
use crate::registry::{CropPolicy, ImageConfig, ThumbnailPolicy};
use crate::types::{ProcessedImage, RawImage};

/// Decides whether a static input should be re-encoded as JPEG regardless of
/// its declared format.
pub trait ConversionPolicy: Send + Sync {
    fn convert_to_jpeg(&self, raw: &RawImage) -> bool;
}

/// Treats PNGs over a byte threshold as photographs, which compress far
/// better as JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LargePngIsPhoto {
    pub threshold_bytes: u64,
}

impl LargePngIsPhoto {
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            threshold_bytes: config.png_photo_threshold_bytes,
        }
    }
}

impl Default for LargePngIsPhoto {
    fn default() -> Self {
        Self::from_config(&ConversionConfig::default())
    }
}

impl ConversionPolicy for LargePngIsPhoto {
    fn convert_to_jpeg(&self, raw: &RawImage) -> bool {
        raw.mime_type.eq_ignore_ascii_case("image/png") && raw.size_bytes() > self.threshold_bytes
    }
}

/// What the compressor aims for. Built from a purpose's [`ImageConfig`] or
/// its [`ThumbnailPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressTarget {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
    pub crop_policy: CropPolicy,
    pub skip_compression_threshold_bytes: u64,
}

impl CompressTarget {
    /// Thumbnails always fit; they share the full config's skip threshold.
    pub fn thumbnail(policy: &ThumbnailPolicy, skip_compression_threshold_bytes: u64) -> Self {
        Self {
            max_width: policy.max_width,
            max_height: policy.max_height,
            quality: policy.quality,
            crop_policy: CropPolicy::Fit,
            skip_compression_threshold_bytes,
        }
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

impl From<&ImageConfig> for CompressTarget {
    fn from(config: &ImageConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality,
            crop_policy: config.crop_policy,
            skip_compression_threshold_bytes: config.skip_compression_threshold_bytes,
        }
    }
}

/// Draw step needed to bring `source` onto the target, if any.
fn plan_draw(source: Dimensions, target: &CompressTarget) -> Option<DrawParams> {
    match target.crop_policy {
        CropPolicy::CropToFill => {
            if source.as_tuple() == target.bounds() {
                return None;
            }
            Some(DrawParams {
                width: target.max_width,
                height: target.max_height,
                mode: DrawMode::Cover,
            })
        }
        CropPolicy::Fit => {
            let (width, height) = calculate_fit_dimensions(source.as_tuple(), target.bounds());
            if (width, height) == source.as_tuple() {
                return None;
            }
            Some(DrawParams {
                width,
                height,
                mode: DrawMode::Scale,
            })
        }
    }
}

/// Compress one static image toward `target`.
pub fn compress<C: RasterCodec>(
    codec: &C,
    raw: &RawImage,
    target: &CompressTarget,
    conversion: &dyn ConversionPolicy,
) -> Result<ProcessedImage, BackendError> {
    if raw.size_bytes() < target.skip_compression_threshold_bytes {
        match codec.probe(&raw.bytes) {
            Ok(dims) if fits_within(dims.as_tuple(), target.bounds()) => {
                tracing::debug!(
                    size_bytes = raw.size_bytes(),
                    width = dims.width,
                    height = dims.height,
                    "small and within bounds, skipping compression"
                );
                return Ok(ProcessedImage::unchanged(raw, Some(dims)));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "dimension probe failed, compressing anyway");
            }
        }
    }

    let decoded = codec.decode(&raw.bytes)?;
    let source = decoded.dimensions;
    let output = match plan_draw(source, target) {
        Some(params) => codec.draw_scaled(&decoded.surface, &params)?,
        None => decoded,
    };

    let format = if conversion.convert_to_jpeg(raw) {
        tracing::debug!(
            mime_type = %raw.mime_type,
            size_bytes = raw.size_bytes(),
            "converting to JPEG"
        );
        OutputFormat::Jpeg
    } else {
        OutputFormat::for_mime(&raw.mime_type)
    };
    let bytes = codec.encode(&output.surface, format, target.quality)?;
    if bytes.is_empty() {
        return Err(BackendError::Encode("encoder produced no data".into()));
    }

    let processed = ProcessedImage::encoded(raw.size_bytes(), bytes, format, output.dimensions);
    tracing::debug!(
        from_width = source.width,
        from_height = source.height,
        to_width = output.dimensions.width,
        to_height = output.dimensions.height,
        format = format.mime_type(),
        input_bytes = raw.size_bytes(),
        output_bytes = processed.size_bytes,
        "compressed"
    );
    Ok(processed)
}
