//! Dispatch by declared MIME type.
//!
//! The router trusts the caller's declared type; it never sniffs bytes. A GIF
//! declared as `image/png` takes the static path and is re-encoded from its
//! first frame, which is the same outcome the static compressor gives any
//! single-frame input.

use crate::registry::ThumbnailPolicy;
use crate::types::RawImage;

/// Which handler an input goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Static,
    Gif,
}

/// Size class of a GIF attachment against the thumbnail trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifClass {
    /// At or below the trigger: shipped alone.
    Small,
    /// Above the trigger: shipped with a static thumbnail.
    Large,
}

pub fn route(raw: &RawImage) -> Route {
    if raw.is_gif() { Route::Gif } else { Route::Static }
}

/// Classify a GIF by file size alone. Independent of the hard ceiling, which
/// is checked separately.
pub fn classify_gif(raw: &RawImage, policy: &ThumbnailPolicy) -> GifClass {
    if raw.size_bytes() > policy.gif_trigger_bytes {
        GifClass::Large
    } else {
        GifClass::Small
    }
}
