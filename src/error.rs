//! Failure taxonomy and user-facing text.
//!
//! Every pipeline failure is one of five kinds. All are terminal for the call:
//! compression is deterministic, so retrying the same bytes fails the same
//! way. The UI shows [`ProcessError::user_message`] and asks for another file.

use crate::imaging::BackendError;
use crate::registry::Purpose;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("input exceeds the {} upload limit", display_size(.limit))]
    FileTooLarge { limit: u64 },
    #[error("{purpose} GIF exceeds the {} limit", display_size(.limit))]
    GifTooLarge { purpose: Purpose, limit: u64 },
    #[error("GIF input is not accepted for {purpose}")]
    GifUnsupported { purpose: Purpose },
    #[error("{purpose} compression failed: {source}")]
    CompressionFailed {
        purpose: Purpose,
        #[source]
        source: BackendError,
    },
    #[error("image dimensions could not be read: {source}")]
    DimensionProbeFailed {
        #[source]
        source: BackendError,
    },
}

/// Fieldless category for callers that branch on failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileTooLarge,
    GifTooLarge,
    GifUnsupported,
    CompressionFailed,
    DimensionProbeFailed,
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::GifTooLarge { .. } => ErrorKind::GifTooLarge,
            Self::GifUnsupported { .. } => ErrorKind::GifUnsupported,
            Self::CompressionFailed { .. } => ErrorKind::CompressionFailed,
            Self::DimensionProbeFailed { .. } => ErrorKind::DimensionProbeFailed,
        }
    }

    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileTooLarge { limit } => {
                format!("File cannot be larger than {}", format_file_size(*limit))
            }
            Self::GifTooLarge { purpose, limit } => match purpose {
                Purpose::Emoji => format!(
                    "Animated emoji GIFs cannot be larger than {}",
                    format_file_size(*limit)
                ),
                Purpose::Sticker => format!(
                    "Animated sticker GIFs cannot be larger than {}",
                    format_file_size(*limit)
                ),
                Purpose::Avatar
                | Purpose::SpaceIcon
                | Purpose::SpaceBanner
                | Purpose::MessageAttachment => {
                    format!("GIF files cannot be larger than {}", format_file_size(*limit))
                }
            },
            Self::GifUnsupported { .. } => "GIF files are not allowed for this image type".into(),
            Self::CompressionFailed { purpose, .. } => match purpose {
                Purpose::Emoji => {
                    "Failed to process emoji image. Please try a different file.".into()
                }
                Purpose::Sticker => {
                    "Failed to process sticker image. Please try a different file.".into()
                }
                Purpose::Avatar
                | Purpose::SpaceIcon
                | Purpose::SpaceBanner
                | Purpose::MessageAttachment => {
                    "Failed to process image. Please try a different file.".into()
                }
            },
            Self::DimensionProbeFailed { .. } => {
                "Could not read image dimensions. Please try a different file.".into()
            }
        }
    }
}

fn display_size(bytes: &u64) -> String {
    format_file_size(*bytes)
}

/// Human-readable byte count: `512B`, `100KB`, `2MB`, `1.5MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    if bytes < KB {
        format!("{bytes}B")
    } else if bytes < MB {
        format!("{}KB", (bytes as f64 / KB as f64).round() as u64)
    } else {
        let tenths = (bytes as f64 / MB as f64 * 10.0).round() as u64;
        if tenths % 10 == 0 {
            format!("{}MB", tenths / 10)
        } else {
            format!("{}.{}MB", tenths / 10, tenths % 10)
        }
    }
}
