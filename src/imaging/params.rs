//! Parameter types for codec operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`pipeline`](crate::pipeline) (which decides what
//! artifact to produce) and the [`backend`](super::backend) (which does the
//! actual pixel work). This separation allows swapping codecs (e.g. for testing
//! with a mock) without changing policy logic.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1–100). Built from the registry's
//!   `(0, 1]` fraction; clamped on construction.
//! - [`OutputFormat`]: target encoding (JPEG, PNG, WebP) and its MIME type.
//! - [`DrawMode`] / [`DrawParams`]: target box for a scale operation and
//!   whether excess content is cropped to fill it.

use serde::Serialize;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    /// Convert a `(0, 1]` quality fraction into an encoder quality.
    pub fn from_fraction(fraction: f32) -> Self {
        Self::new((fraction * 100.0).round() as u32)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    /// Lossy WebP at the requested quality.
    WebP,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Re-encoding target for a declared input MIME type.
    ///
    /// Formats we cannot write losslessly-or-better (BMP, TIFF, unknown) fall
    /// back to JPEG.
    pub fn for_mime(mime_type: &str) -> Self {
        match mime_type.to_ascii_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/webp" => Self::WebP,
            _ => Self::Jpeg,
        }
    }
}

/// How a surface is mapped onto the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Scale to exactly `width × height`. Callers pre-compute an
    /// aspect-preserving box when they want one.
    Scale,
    /// Scale to cover `width × height`, then center-crop the excess.
    Cover,
}

/// Target box for [`RasterCodec::draw_scaled`](super::RasterCodec::draw_scaled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawParams {
    pub width: u32,
    pub height: u32,
    pub mode: DrawMode,
}
