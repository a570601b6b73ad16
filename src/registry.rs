//! Purpose → configuration registry.
//!
//! Every image enters the pipeline tagged with a [`Purpose`]. The purpose
//! selects a compiled-in, immutable [`ImageConfig`] via [`lookup`]. The table
//! is a `const fn` over a closed enum, so adding a purpose fails to compile
//! until every `match` on [`Purpose`] in the crate handles it.
//!
//! ## Values
//!
//! | Purpose | Box | Crop | Skip below | GIF ceiling | Animation | Thumbnail |
//! |---|---|---|---|---|---|---|
//! | avatar | 123×123 | crop-to-fill | 50KB | no | no | no |
//! | space-icon | 123×123 | crop-to-fill | 50KB | no | no | no |
//! | space-banner | 450×253 | fit | 100KB | no | no | no |
//! | message-attachment | 1200×1200 | fit | 100KB | 2MB | kept | 300×300 at >300px / >500KB GIF |
//! | emoji | 36×36 | crop-to-fill | 50KB | 100KB | kept | no |
//! | sticker | 400×600 | fit | 100KB | 750KB | kept | no |
//!
//! All qualities are 0.8.

use crate::imaging::Quality;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;

/// Application context that selects an image's target configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    Avatar,
    SpaceIcon,
    SpaceBanner,
    MessageAttachment,
    Emoji,
    Sticker,
}

impl Purpose {
    pub const ALL: [Purpose; 6] = [
        Purpose::Avatar,
        Purpose::SpaceIcon,
        Purpose::SpaceBanner,
        Purpose::MessageAttachment,
        Purpose::Emoji,
        Purpose::Sticker,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Avatar => "avatar",
            Purpose::SpaceIcon => "space-icon",
            Purpose::SpaceBanner => "space-banner",
            Purpose::MessageAttachment => "message-attachment",
            Purpose::Emoji => "emoji",
            Purpose::Sticker => "sticker",
        }
    }

    /// Whether animated GIF input is accepted at all for this purpose.
    pub fn accepts_gif(self) -> bool {
        lookup(self).gif_size_limit_bytes.is_some()
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image purpose '{0}'")]
pub struct UnknownPurpose(pub String);

impl FromStr for Purpose {
    type Err = UnknownPurpose;

    /// Accepts kebab-case (`space-icon`) and camelCase (`spaceIcon`) names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "avatar" => Ok(Purpose::Avatar),
            "spaceicon" => Ok(Purpose::SpaceIcon),
            "spacebanner" => Ok(Purpose::SpaceBanner),
            "messageattachment" | "attachment" => Ok(Purpose::MessageAttachment),
            "emoji" => Ok(Purpose::Emoji),
            "sticker" => Ok(Purpose::Sticker),
            _ => Err(UnknownPurpose(s.to_string())),
        }
    }
}

/// How a static image is mapped onto the purpose's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropPolicy {
    /// Scale down preserving aspect ratio; never crop, never upscale.
    Fit,
    /// Produce exactly `max_width × max_height`, cropping excess content.
    CropToFill,
}

/// Dual-resolution policy (message attachments only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThumbnailPolicy {
    pub max_width: u32,
    pub max_height: u32,
    #[serde(serialize_with = "serialize_quality")]
    pub quality: Quality,
    /// Static images with either edge longer than this get a thumbnail.
    pub trigger_edge_px: u32,
    /// GIFs larger than this (in bytes) get a thumbnail, regardless of pixels.
    pub gif_trigger_bytes: u64,
}

/// Target configuration for one purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageConfig {
    pub max_width: u32,
    pub max_height: u32,
    #[serde(serialize_with = "serialize_quality")]
    pub quality: Quality,
    pub crop_policy: CropPolicy,
    /// Inputs smaller than this and already within bounds are returned as-is.
    pub skip_compression_threshold_bytes: u64,
    /// `None` means GIFs are rejected for this purpose.
    pub gif_size_limit_bytes: Option<u64>,
    pub preserve_gif_animation: bool,
    pub thumbnail: Option<ThumbnailPolicy>,
}

fn serialize_quality<S: serde::Serializer>(q: &Quality, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f32(q.fraction())
}

impl ImageConfig {
    pub fn bounds(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }
}

const SQUARE_ICON: ImageConfig = ImageConfig {
    max_width: 123,
    max_height: 123,
    quality: Quality(80),
    crop_policy: CropPolicy::CropToFill,
    skip_compression_threshold_bytes: 50 * KB,
    gif_size_limit_bytes: None,
    preserve_gif_animation: false,
    thumbnail: None,
};

/// Look up the configuration for a purpose.
pub const fn lookup(purpose: Purpose) -> ImageConfig {
    match purpose {
        Purpose::Avatar | Purpose::SpaceIcon => SQUARE_ICON,
        Purpose::SpaceBanner => ImageConfig {
            max_width: 450,
            max_height: 253,
            quality: Quality(80),
            crop_policy: CropPolicy::Fit,
            skip_compression_threshold_bytes: 100 * KB,
            gif_size_limit_bytes: None,
            preserve_gif_animation: false,
            thumbnail: None,
        },
        Purpose::MessageAttachment => ImageConfig {
            max_width: 1200,
            max_height: 1200,
            quality: Quality(80),
            crop_policy: CropPolicy::Fit,
            skip_compression_threshold_bytes: 100 * KB,
            gif_size_limit_bytes: Some(2 * MB),
            preserve_gif_animation: true,
            thumbnail: Some(ThumbnailPolicy {
                max_width: 300,
                max_height: 300,
                quality: Quality(80),
                trigger_edge_px: 300,
                gif_trigger_bytes: 500 * KB,
            }),
        },
        Purpose::Emoji => ImageConfig {
            max_width: 36,
            max_height: 36,
            quality: Quality(80),
            crop_policy: CropPolicy::CropToFill,
            skip_compression_threshold_bytes: 50 * KB,
            gif_size_limit_bytes: Some(100 * KB),
            preserve_gif_animation: true,
            thumbnail: None,
        },
        // Displayed at 300px wide; the height cap stops very tall stickers.
        Purpose::Sticker => ImageConfig {
            max_width: 400,
            max_height: 600,
            quality: Quality(80),
            crop_policy: CropPolicy::Fit,
            skip_compression_threshold_bytes: 100 * KB,
            gif_size_limit_bytes: Some(750 * KB),
            preserve_gif_animation: true,
            thumbnail: None,
        },
    }
}
