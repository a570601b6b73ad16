//! GIF handling: purpose gate, hard size ceiling, animation passthrough or
//! first-frame extraction.
//!
//! Animated GIFs are never re-encoded. Where a purpose keeps animation the
//! original bytes go out untouched; otherwise the first frame becomes a static
//! JPEG.

use crate::error::ProcessError;
use crate::imaging::{
    BackendError, DrawMode, DrawParams, OutputFormat, Quality, RasterCodec,
    calculate_fit_dimensions,
};
use crate::registry::{ImageConfig, Purpose};
use crate::types::{ProcessedImage, RawImage};

/// Reject GIFs for purposes that do not take them, and GIFs over the
/// purpose's hard ceiling.
pub fn validate_gif_size(
    raw: &RawImage,
    purpose: Purpose,
    config: &ImageConfig,
) -> Result<(), ProcessError> {
    let Some(limit) = config.gif_size_limit_bytes else {
        return Err(ProcessError::GifUnsupported { purpose });
    };
    if raw.size_bytes() > limit {
        tracing::debug!(%purpose, size_bytes = raw.size_bytes(), limit, "GIF over ceiling");
        return Err(ProcessError::GifTooLarge { purpose, limit });
    }
    Ok(())
}

/// Validate, then pass through or flatten to the first frame.
pub fn process_gif<C: RasterCodec>(
    codec: &C,
    raw: &RawImage,
    purpose: Purpose,
    config: &ImageConfig,
    frame_quality: Quality,
) -> Result<ProcessedImage, ProcessError> {
    validate_gif_size(raw, purpose, config)?;

    if config.preserve_gif_animation {
        tracing::debug!(%purpose, size_bytes = raw.size_bytes(), "keeping GIF animation");
        return Ok(ProcessedImage::unchanged(raw, None));
    }

    let max_edge = config.max_width.max(config.max_height);
    extract_first_frame(codec, raw, max_edge, frame_quality)
        .map_err(|source| ProcessError::CompressionFailed { purpose, source })
}

/// Decode the first frame, fit it into a `max_edge` square, and encode it as
/// JPEG.
pub fn extract_first_frame<C: RasterCodec>(
    codec: &C,
    raw: &RawImage,
    max_edge: u32,
    quality: Quality,
) -> Result<ProcessedImage, BackendError> {
    let decoded = codec.decode(&raw.bytes)?;
    let (width, height) =
        calculate_fit_dimensions(decoded.dimensions.as_tuple(), (max_edge, max_edge));
    let frame = if (width, height) == decoded.dimensions.as_tuple() {
        decoded
    } else {
        codec.draw_scaled(
            &decoded.surface,
            &DrawParams {
                width,
                height,
                mode: DrawMode::Scale,
            },
        )?
    };

    let bytes = codec.encode(&frame.surface, OutputFormat::Jpeg, quality)?;
    if bytes.is_empty() {
        return Err(BackendError::Encode("encoder produced no data".into()));
    }
    tracing::debug!(
        width = frame.dimensions.width,
        height = frame.dimensions.height,
        output_bytes = bytes.len(),
        "extracted first GIF frame"
    );
    Ok(ProcessedImage::encoded(
        raw.size_bytes(),
        bytes,
        OutputFormat::Jpeg,
        frame.dimensions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockCodec, RecordedOp, mock_image};
    use crate::registry::lookup;

    const KB: usize = 1024;

    fn gif(width: u32, height: u32, size: usize) -> RawImage {
        RawImage::new(mock_image(width, height, size), "image/gif")
    }

    fn flattening(purpose: Purpose) -> ImageConfig {
        ImageConfig {
            preserve_gif_animation: false,
            ..lookup(purpose)
        }
    }

    #[test]
    fn gif_rejected_for_purposes_without_ceiling() {
        for purpose in [Purpose::Avatar, Purpose::SpaceIcon, Purpose::SpaceBanner] {
            let err = validate_gif_size(&gif(10, 10, KB), purpose, &lookup(purpose)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::GifUnsupported, "{purpose}");
        }
    }

    #[test]
    fn emoji_ceiling() {
        let config = lookup(Purpose::Emoji);
        assert!(validate_gif_size(&gif(36, 36, 80 * KB), Purpose::Emoji, &config).is_ok());
        assert!(validate_gif_size(&gif(36, 36, 100 * KB), Purpose::Emoji, &config).is_ok());

        let err = validate_gif_size(&gif(36, 36, 150 * KB), Purpose::Emoji, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GifTooLarge);
        assert_eq!(
            err.user_message(),
            "Animated emoji GIFs cannot be larger than 100KB"
        );
    }

    #[test]
    fn sticker_ceiling() {
        let config = lookup(Purpose::Sticker);
        let err =
            validate_gif_size(&gif(400, 400, 751 * KB), Purpose::Sticker, &config).unwrap_err();
        assert!(matches!(
            err,
            ProcessError::GifTooLarge {
                purpose: Purpose::Sticker,
                ..
            }
        ));
    }

    #[test]
    fn preserved_gif_is_byte_identical() {
        let codec = MockCodec::new();
        let raw = gif(400, 400, 300 * KB);
        let out = process_gif(
            &codec,
            &raw,
            Purpose::Sticker,
            &lookup(Purpose::Sticker),
            Quality::default(),
        )
        .unwrap();
        assert_eq!(out.bytes, raw.bytes);
        assert_eq!(out.mime_type, "image/gif");
        assert!(!out.was_compressed);
        assert_eq!(out.compression_ratio, 1.0);
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn flattening_extracts_first_frame_as_jpeg() {
        let codec = MockCodec::new();
        let raw = gif(800, 400, 300 * KB);
        let out = process_gif(
            &codec,
            &raw,
            Purpose::Sticker,
            &flattening(Purpose::Sticker),
            Quality::new(80),
        )
        .unwrap();

        assert_eq!(out.mime_type, "image/jpeg");
        assert!(out.was_compressed);
        // fitted into a 600x600 square (max of 400 and 600)
        assert_eq!(out.dimensions, Some(Dimensions::new(600, 300)));
        assert_eq!(
            codec.get_operations().last(),
            Some(&RecordedOp::Encode {
                width: 600,
                height: 300,
                format: OutputFormat::Jpeg,
                quality: 80
            })
        );
    }

    #[test]
    fn flattening_small_gif_skips_draw() {
        let codec = MockCodec::new();
        let raw = gif(20, 20, 10 * KB);
        let out = process_gif(
            &codec,
            &raw,
            Purpose::Emoji,
            &flattening(Purpose::Emoji),
            Quality::new(80),
        )
        .unwrap();
        assert_eq!(out.dimensions, Some(Dimensions::new(20, 20)));
        assert!(
            !codec
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Draw { .. }))
        );
    }

    #[test]
    fn ceiling_checked_before_flattening() {
        let codec = MockCodec::new();
        let raw = gif(36, 36, 200 * KB);
        let err = process_gif(
            &codec,
            &raw,
            Purpose::Emoji,
            &flattening(Purpose::Emoji),
            Quality::new(80),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GifTooLarge);
        assert!(codec.get_operations().is_empty());
    }

    #[test]
    fn frame_decode_failure_is_compression_failure() {
        let codec = MockCodec::failing_decode();
        let raw = gif(400, 400, 10 * KB);
        let err = process_gif(
            &codec,
            &raw,
            Purpose::Sticker,
            &flattening(Purpose::Sticker),
            Quality::new(80),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CompressionFailed);
        assert_eq!(
            err.user_message(),
            "Failed to process sticker image. Please try a different file."
        );
    }

    #[test]
    fn frame_encode_failure_releases_surfaces() {
        let codec = MockCodec::failing_encode();
        let raw = gif(1600, 1600, 10 * KB);
        let result = extract_first_frame(&codec, &raw, 300, Quality::new(80));
        assert!(matches!(result, Err(BackendError::Encode(_))));
        assert_eq!(codec.live_surfaces(), 0);
    }
}
