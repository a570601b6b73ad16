//! Pipeline settings.
//!
//! The purpose table in [`registry`](crate::registry) is compiled in and never
//! changes at runtime. The handful of operational constants around it (upload
//! ceilings, the PNG-photo heuristic threshold, first-frame quality) live here
//! and can be overridden from a TOML file.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [limits]
//! max_input_bytes = 26214400        # 25MB ceiling for raw uploads
//! max_emoji_input_bytes = 5242880   # 5MB ceiling for emoji uploads
//!
//! [conversion]
//! png_photo_threshold_bytes = 750000  # PNGs above this are re-encoded as JPEG
//!
//! [gif]
//! frame_quality = 0.8               # Quality for first-frame extraction
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [conversion]
//! png_photo_threshold_bytes = 1000000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Operational settings for a [`Pipeline`](crate::pipeline::Pipeline).
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// Raw-upload byte ceilings, enforced before decoding.
    pub limits: LimitsConfig,
    /// Format conversion heuristics.
    pub conversion: ConversionConfig,
    /// GIF frame extraction settings.
    pub gif: GifConfig,
}

/// Raw-upload byte ceilings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Ceiling for every purpose except emoji.
    pub max_input_bytes: u64,
    /// Ceiling for emoji uploads.
    pub max_emoji_input_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 25 * 1024 * 1024,
            max_emoji_input_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Format conversion heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// PNG inputs strictly larger than this are treated as photographs and
    /// re-encoded as JPEG.
    pub png_photo_threshold_bytes: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            png_photo_threshold_bytes: 750_000,
        }
    }
}

/// GIF frame extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GifConfig {
    /// JPEG quality in `(0, 1]` for static frames taken from GIFs.
    pub frame_quality: f32,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self { frame_quality: 0.8 }
    }
}

impl GifConfig {
    pub fn quality(&self) -> Quality {
        Quality::from_fraction(self.frame_quality)
    }
}

impl PipelineSettings {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_input_bytes == 0 || self.limits.max_emoji_input_bytes == 0 {
            return Err(ConfigError::Validation(
                "limits must be greater than zero".into(),
            ));
        }
        if !(self.gif.frame_quality > 0.0 && self.gif.frame_quality <= 1.0) {
            return Err(ConfigError::Validation(
                "gif.frame_quality must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: PipelineSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Returns a fully-commented stock settings file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# inline-imaging pipeline settings
# =================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Per-purpose dimensions, qualities and GIF ceilings are fixed and not
# configurable here; run `inline-imaging purposes` to list them.

# ---------------------------------------------------------------------------
# Upload ceilings (checked before any decoding)
# ---------------------------------------------------------------------------
[limits]
# 25MB for avatars, banners, attachments and stickers.
max_input_bytes = 26214400

# 5MB for emoji.
max_emoji_input_bytes = 5242880

# ---------------------------------------------------------------------------
# Format conversion
# ---------------------------------------------------------------------------
[conversion]
# PNGs larger than this are assumed to be photographs and re-encoded as JPEG.
png_photo_threshold_bytes = 750000

# ---------------------------------------------------------------------------
# GIF handling
# ---------------------------------------------------------------------------
[gif]
# JPEG quality (0-1] for static frames taken from GIFs.
frame_quality = 0.8
"##
}
