//! Dual-resolution output for message attachments.
//!
//! ```text
//! GIF    ── over hard ceiling ──────────→ GifTooLarge
//!        ── over thumbnail trigger ─────→ JPEG first-frame thumbnail + original (large GIF)
//!        ── otherwise ──────────────────→ original only
//! static ── either edge over trigger ───→ 300×300 thumbnail + full, concurrently
//!        ── dimensions unreadable ──────→ full only if it decodes, else DimensionProbeFailed
//!        ── otherwise ──────────────────→ full only
//! ```
//!
//! Thumbnail and full artifacts are independent, so they run on the rayon
//! pool via [`rayon::join`]. Both always finish; if either fails the whole
//! call fails, the thumbnail's error taking precedence.

use super::Pipeline;
use super::compressor::{self, CompressTarget};
use super::gif;
use super::router::{self, GifClass, Route};
use super::validate;
use crate::error::ProcessError;
use crate::imaging::{RasterCodec, exceeds_edge};
use crate::registry::{ImageConfig, Purpose, ThumbnailPolicy, lookup};
use crate::types::{AttachmentResult, ProcessedImage, RawImage};

/// Whether an input gets a thumbnail under `config`.
///
/// GIFs are judged by file size, static images by pixel dimensions. Probing a
/// static image that cannot be read fails with
/// [`ProcessError::DimensionProbeFailed`].
pub fn needs_thumbnail<C: RasterCodec>(
    codec: &C,
    raw: &RawImage,
    config: &ImageConfig,
) -> Result<bool, ProcessError> {
    let Some(policy) = config.thumbnail else {
        return Ok(false);
    };
    match router::route(raw) {
        Route::Gif => Ok(router::classify_gif(raw, &policy) == GifClass::Large),
        Route::Static => {
            let dims = codec
                .probe(&raw.bytes)
                .map_err(|source| ProcessError::DimensionProbeFailed { source })?;
            Ok(exceeds_edge(dims.as_tuple(), policy.trigger_edge_px))
        }
    }
}

/// Produce a static thumbnail. GIFs are flattened to their first frame.
pub fn generate_thumbnail<C: RasterCodec>(
    pipeline: &Pipeline<C>,
    raw: &RawImage,
    purpose: Purpose,
    policy: &ThumbnailPolicy,
    skip_compression_threshold_bytes: u64,
) -> Result<ProcessedImage, ProcessError> {
    let result = match router::route(raw) {
        Route::Gif => gif::extract_first_frame(
            pipeline.codec(),
            raw,
            policy.max_width.max(policy.max_height),
            pipeline.settings().gif.quality(),
        ),
        Route::Static => compressor::compress(
            pipeline.codec(),
            raw,
            &CompressTarget::thumbnail(policy, skip_compression_threshold_bytes),
            pipeline.conversion(),
        ),
    };
    result.map_err(|source| ProcessError::CompressionFailed { purpose, source })
}

/// Full attachment flow for one input.
///
/// When the header of a static image cannot be read, the full-size path is
/// still attempted since a full decode may succeed where the header read did
/// not. Only if that also fails does the call return
/// [`ProcessError::DimensionProbeFailed`].
pub fn process_attachment<C: RasterCodec>(
    pipeline: &Pipeline<C>,
    raw: &RawImage,
) -> Result<AttachmentResult, ProcessError> {
    let purpose = Purpose::MessageAttachment;
    let config = lookup(purpose);

    validate::validate(raw, purpose, &pipeline.settings().limits)?;
    if raw.is_gif() {
        gif::validate_gif_size(raw, purpose, &config)?;
    }

    let full_only = |full: ProcessedImage| AttachmentResult {
        full,
        thumbnail: None,
        is_large_gif: false,
    };
    let policy = match config.thumbnail {
        Some(policy) => match needs_thumbnail(pipeline.codec(), raw, &config) {
            Ok(true) => policy,
            Ok(false) => return pipeline.process_image(raw, purpose).map(full_only),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    mime_type = %raw.mime_type,
                    "cannot read attachment dimensions, trying full image only"
                );
                return pipeline
                    .process_image(raw, purpose)
                    .map(full_only)
                    .map_err(|_| err);
            }
        },
        None => return pipeline.process_image(raw, purpose).map(full_only),
    };

    tracing::debug!(
        size_bytes = raw.size_bytes(),
        mime_type = %raw.mime_type,
        "generating thumbnail alongside full image"
    );
    let (thumbnail, full) = rayon::join(
        || {
            generate_thumbnail(
                pipeline,
                raw,
                purpose,
                &policy,
                config.skip_compression_threshold_bytes,
            )
        },
        || pipeline.process_image(raw, purpose),
    );
    let thumbnail = thumbnail?;
    let full = full?;

    Ok(AttachmentResult {
        full,
        thumbnail: Some(thumbnail),
        is_large_gif: raw.is_gif(),
    })
}
