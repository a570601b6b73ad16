//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! avatar
//!     Source: photo.jpg (image/jpeg, 1.2MB)
//!     Output: image/jpeg 123x123, 5KB
//!     Compression: 245.8x
//! ```
//!
//! ## Attachment
//!
//! ```text
//! message-attachment
//!     Source: anim.gif (image/gif, 1.5MB)
//!     full: image/gif, 1.5MB (unchanged)
//!     thumbnail: image/jpeg 300x225, 12KB
//!     Large GIF: thumbnail shown until the full file loads
//! ```
//!
//! ## Purposes
//!
//! ```text
//! avatar              123x123    crop-to-fill  skip <50KB   GIF: no
//! message-attachment  1200x1200  fit           skip <100KB  GIF: <=2MB, animated  thumbnail 300x300
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects. `--json` output goes through the
//! `*Summary` types, which describe artifacts without their bytes.

use crate::error::{ProcessError, format_file_size};
use crate::imaging::Dimensions;
use crate::registry::{CropPolicy, Purpose, lookup};
use crate::types::{AttachmentResult, ProcessedImage, RawImage};
use serde::Serialize;
use std::error::Error as _;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn dims_label(dimensions: Option<Dimensions>) -> String {
    match dimensions {
        Some(d) => format!(" {}x{}", d.width, d.height),
        None => String::new(),
    }
}

/// One artifact line: `image/jpeg 123x123, 5KB` or `image/gif, 1.5MB (unchanged)`.
fn artifact_line(image: &ProcessedImage) -> String {
    let mut line = format!(
        "{}{}, {}",
        image.mime_type,
        dims_label(image.dimensions),
        format_file_size(image.size_bytes)
    );
    if !image.was_compressed {
        line.push_str(" (unchanged)");
    }
    line
}

fn source_line(name: &str, raw: &RawImage) -> String {
    format!(
        "{}Source: {} ({}, {})",
        indent(1),
        name,
        raw.mime_type,
        format_file_size(raw.size_bytes())
    )
}

// ============================================================================
// process
// ============================================================================

pub fn format_processed(
    purpose: Purpose,
    source_name: &str,
    raw: &RawImage,
    image: &ProcessedImage,
) -> Vec<String> {
    let mut lines = vec![
        purpose.to_string(),
        source_line(source_name, raw),
        format!("{}Output: {}", indent(1), artifact_line(image)),
    ];
    if image.was_compressed {
        lines.push(format!(
            "{}Compression: {:.1}x",
            indent(1),
            image.compression_ratio
        ));
    }
    lines
}

pub fn print_processed(purpose: Purpose, source_name: &str, raw: &RawImage, image: &ProcessedImage) {
    for line in format_processed(purpose, source_name, raw, image) {
        println!("{}", line);
    }
}

// ============================================================================
// attachment
// ============================================================================

pub fn format_attachment(source_name: &str, raw: &RawImage, result: &AttachmentResult) -> Vec<String> {
    let mut lines = vec![
        Purpose::MessageAttachment.to_string(),
        source_line(source_name, raw),
        format!("{}full: {}", indent(1), artifact_line(&result.full)),
    ];
    match &result.thumbnail {
        Some(thumb) => lines.push(format!("{}thumbnail: {}", indent(1), artifact_line(thumb))),
        None => lines.push(format!("{}thumbnail: none", indent(1))),
    }
    if result.is_large_gif {
        lines.push(format!(
            "{}Large GIF: thumbnail shown until the full file loads",
            indent(1)
        ));
    }
    lines
}

pub fn print_attachment(source_name: &str, raw: &RawImage, result: &AttachmentResult) {
    for line in format_attachment(source_name, raw, result) {
        println!("{}", line);
    }
}

// ============================================================================
// purposes
// ============================================================================

pub fn format_purposes() -> Vec<String> {
    let name_width = Purpose::ALL
        .iter()
        .map(|p| p.as_str().len())
        .max()
        .unwrap_or(0);

    Purpose::ALL
        .iter()
        .map(|&purpose| {
            let config = lookup(purpose);
            let crop = match config.crop_policy {
                CropPolicy::Fit => "fit",
                CropPolicy::CropToFill => "crop-to-fill",
            };
            let gif = match config.gif_size_limit_bytes {
                None => "GIF: no".to_string(),
                Some(limit) if config.preserve_gif_animation => {
                    format!("GIF: <={}, animated", format_file_size(limit))
                }
                Some(limit) => format!("GIF: <={}, first frame", format_file_size(limit)),
            };
            let mut line = format!(
                "{:<name_width$}  {:<9}  {:<12}  {:<11}  {}",
                purpose.as_str(),
                format!("{}x{}", config.max_width, config.max_height),
                crop,
                format!(
                    "skip <{}",
                    format_file_size(config.skip_compression_threshold_bytes)
                ),
                gif,
            );
            if let Some(thumb) = config.thumbnail {
                line.push_str(&format!(
                    "  thumbnail {}x{}",
                    thumb.max_width, thumb.max_height
                ));
            }
            line
        })
        .collect()
}

pub fn print_purposes() {
    for line in format_purposes() {
        println!("{}", line);
    }
}

// ============================================================================
// errors
// ============================================================================

/// User-facing message first, technical detail indented below.
pub fn format_error(err: &ProcessError) -> Vec<String> {
    let mut lines = vec![err.user_message(), format!("{}{}", indent(1), err)];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("{}caused by: {}", indent(1), cause));
        source = cause.source();
    }
    lines
}

// ============================================================================
// --json
// ============================================================================

/// An artifact without its bytes.
#[derive(Debug, Serialize)]
pub struct ImageSummary {
    pub mime_type: String,
    pub size_bytes: u64,
    pub compression_ratio: f64,
    pub was_compressed: bool,
    pub dimensions: Option<Dimensions>,
}

impl From<&ProcessedImage> for ImageSummary {
    fn from(image: &ProcessedImage) -> Self {
        Self {
            mime_type: image.mime_type.clone(),
            size_bytes: image.size_bytes,
            compression_ratio: image.compression_ratio,
            was_compressed: image.was_compressed,
            dimensions: image.dimensions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProcessSummary {
    pub purpose: Purpose,
    pub input_bytes: u64,
    pub output: ImageSummary,
}

#[derive(Debug, Serialize)]
pub struct AttachmentSummary {
    pub input_bytes: u64,
    pub full: ImageSummary,
    pub thumbnail: Option<ImageSummary>,
    pub is_large_gif: bool,
}

impl AttachmentSummary {
    pub fn new(raw: &RawImage, result: &AttachmentResult) -> Self {
        Self {
            input_bytes: raw.size_bytes(),
            full: ImageSummary::from(&result.full),
            thumbnail: result.thumbnail.as_ref().map(ImageSummary::from),
            is_large_gif: result.is_large_gif,
        }
    }
}
