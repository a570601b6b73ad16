//! The normalization pipeline.
//!
//! ```text
//! RawImage + Purpose
//!   → validate   (upload ceiling)
//!   → router     (declared MIME: GIF or static)
//!   → gif        (ceiling, passthrough or first frame)
//!   → compressor (fit / cover-crop, format choice, encode)
//!   → ProcessedImage
//! ```
//!
//! Message attachments go through [`thumbnail`], which may run the full and
//! thumbnail branches concurrently.
//!
//! Every call is self-contained: no state survives between calls and the
//! pipeline never retries. [`Pipeline`] only bundles the codec, settings and
//! conversion policy so they are not threaded through every call.

pub mod compressor;
pub mod gif;
pub mod router;
pub mod thumbnail;
pub mod validate;

use crate::config::PipelineSettings;
use crate::error::ProcessError;
use crate::imaging::{RasterCodec, RustCodec};
use crate::registry::{Purpose, lookup};
use crate::types::{AttachmentResult, ProcessedImage, RawImage};
use compressor::{CompressTarget, ConversionPolicy, LargePngIsPhoto};
use router::Route;

/// Image normalization entry point.
pub struct Pipeline<C: RasterCodec = RustCodec> {
    codec: C,
    settings: PipelineSettings,
    conversion: Box<dyn ConversionPolicy>,
}

impl Pipeline<RustCodec> {
    /// Pure-Rust codec with default settings.
    pub fn new() -> Self {
        Self::with_settings(PipelineSettings::default())
    }

    pub fn with_settings(settings: PipelineSettings) -> Self {
        Self::with_codec(RustCodec::new(), settings)
    }
}

impl Default for Pipeline<RustCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RasterCodec> Pipeline<C> {
    /// Any codec. The conversion policy follows `settings.conversion`.
    pub fn with_codec(codec: C, settings: PipelineSettings) -> Self {
        let conversion = Box::new(LargePngIsPhoto::from_config(&settings.conversion));
        Self {
            codec,
            settings,
            conversion,
        }
    }

    /// Replace the large-PNG heuristic.
    pub fn with_conversion_policy(mut self, policy: impl ConversionPolicy + 'static) -> Self {
        self.conversion = Box::new(policy);
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn conversion(&self) -> &dyn ConversionPolicy {
        self.conversion.as_ref()
    }

    /// Normalize one image for `purpose`.
    ///
    /// For [`Purpose::MessageAttachment`] this returns only the full-size
    /// artifact; use [`process_attachment_image`](Self::process_attachment_image)
    /// for the thumbnail too.
    pub fn process_image(
        &self,
        raw: &RawImage,
        purpose: Purpose,
    ) -> Result<ProcessedImage, ProcessError> {
        let config = lookup(purpose);
        validate::validate(raw, purpose, &self.settings.limits)?;

        let result = match router::route(raw) {
            Route::Gif => gif::process_gif(
                &self.codec,
                raw,
                purpose,
                &config,
                self.settings.gif.quality(),
            ),
            Route::Static => compressor::compress(
                &self.codec,
                raw,
                &CompressTarget::from(&config),
                self.conversion(),
            )
            .map_err(|source| ProcessError::CompressionFailed { purpose, source }),
        };

        match &result {
            Ok(out) => tracing::debug!(
                %purpose,
                input_bytes = raw.size_bytes(),
                output_bytes = out.size_bytes,
                was_compressed = out.was_compressed,
                "processed image"
            ),
            Err(e) => tracing::warn!(%purpose, error = %e, "image processing failed"),
        }
        result
    }

    /// Normalize a message attachment, adding a thumbnail when it is large.
    pub fn process_attachment_image(
        &self,
        raw: &RawImage,
    ) -> Result<AttachmentResult, ProcessError> {
        thumbnail::process_attachment(self, raw)
    }
}
