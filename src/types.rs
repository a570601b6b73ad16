//! Values flowing in and out of the pipeline.
//!
//! All of these are transient: built per call, handed to the caller, never
//! retained by the pipeline.

use crate::imaging::{Dimensions, OutputFormat};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};

/// Caller-supplied image bytes with their declared MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl RawImage {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared as `image/gif` (case-insensitive).
    pub fn is_gif(&self) -> bool {
        self.mime_type.eq_ignore_ascii_case("image/gif")
    }
}

/// Output of one transform.
///
/// When `was_compressed` is false, `bytes` are exactly the input bytes and
/// `compression_ratio` is 1. Otherwise `compression_ratio` is
/// `input size / output size`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub size_bytes: u64,
    pub compression_ratio: f64,
    pub was_compressed: bool,
    /// Pixel size when the pipeline measured or produced it. `None` for
    /// GIFs passed through untouched.
    pub dimensions: Option<Dimensions>,
}

impl ProcessedImage {
    /// The input, returned as-is.
    pub fn unchanged(raw: &RawImage, dimensions: Option<Dimensions>) -> Self {
        Self {
            bytes: raw.bytes.clone(),
            mime_type: raw.mime_type.clone(),
            size_bytes: raw.size_bytes(),
            compression_ratio: 1.0,
            was_compressed: false,
            dimensions,
        }
    }

    /// A freshly encoded artifact. `bytes` must be non-empty.
    pub fn encoded(
        input_size: u64,
        bytes: Vec<u8>,
        format: OutputFormat,
        dimensions: Dimensions,
    ) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            bytes,
            mime_type: format.mime_type().to_string(),
            size_bytes,
            compression_ratio: input_size as f64 / size_bytes as f64,
            was_compressed: true,
            dimensions: Some(dimensions),
        }
    }

    /// Base64 payload without the `data:` prefix.
    pub fn to_base64(&self) -> String {
        B64.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>` for inline embedding.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Message-attachment output: the full artifact plus an optional static
/// thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentResult {
    pub full: ProcessedImage,
    pub thumbnail: Option<ProcessedImage>,
    /// GIF above the thumbnail trigger but within the hard ceiling.
    pub is_large_gif: bool,
}
