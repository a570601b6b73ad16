//! # Inline Imaging
//!
//! Client-side image normalization for a chat application. Every image a user
//! uploads is tagged with a [`Purpose`] (avatar, space icon, space banner,
//! message attachment, emoji, sticker) and brought to that purpose's size,
//! shape and format before upload.
//!
//! # Pipeline
//!
//! ```text
//! RawImage + Purpose
//!   1. Validate   upload ceiling (5MB emoji, 25MB otherwise)
//!   2. Route      declared MIME: image/gif → GIF handler, else compressor
//!   3. GIF        reject / ceiling / keep animation / flatten first frame
//!   4. Compress   skip small in-bounds inputs, fit or cover-crop, encode
//!   → ProcessedImage
//! ```
//!
//! Message attachments may also get a 300×300 thumbnail, produced concurrently
//! with the full-size version (see [`pipeline::thumbnail`]).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`registry`] | Purpose enum and the compiled-in per-purpose [`registry::ImageConfig`] table |
//! | [`pipeline`] | Validator, router, compressor, GIF handler, thumbnail generator, and the [`Pipeline`] facade |
//! | [`imaging`] | [`imaging::RasterCodec`] trait, dimension math, and the `image` + `webp` codec |
//! | [`types`] | Values in and out: [`RawImage`], [`ProcessedImage`], [`AttachmentResult`] |
//! | [`error`] | [`ProcessError`] taxonomy and user-facing text |
//! | [`config`] | Overridable operational settings (upload ceilings, PNG heuristic, frame quality) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Closed Purpose Set
//!
//! Purposes are an enum and their configurations a `const fn` table. Adding a
//! purpose is a compile error until every exhaustive `match` (limits, error
//! text, the table itself) handles it. Nothing is looked up by string at run
//! time.
//!
//! ## Animation Is Never Re-encoded
//!
//! GIFs that keep their animation go out byte-identical. Re-encoding animated
//! content is slow and usually grows the file. Purposes that do not keep
//! animation get the first frame as a static JPEG.
//!
//! ## Codec Behind a Trait
//!
//! All pixel work goes through [`imaging::RasterCodec`]: probe, decode, draw
//! into a box, encode. Thresholds and policy choices are tested against a
//! recording mock; the production [`imaging::RustCodec`] uses the `image`
//! crate, so there are no system libraries to install.
//!
//! ## Synchronous API
//!
//! Calls block until done. The only internal parallelism is the attachment
//! thumbnail and full-size branches, run with `rayon::join`. Callers on an
//! async runtime should move calls onto a blocking pool.
//!
//! # Example
//!
//! ```no_run
//! use inline_imaging::{Pipeline, Purpose, RawImage};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let raw = RawImage::new(bytes, "image/jpeg");
//! let avatar = Pipeline::new().process_image(&raw, Purpose::Avatar).unwrap();
//! assert!(avatar.dimensions.unwrap().width <= 123);
//! ```

pub mod config;
pub mod error;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use config::PipelineSettings;
pub use error::{ErrorKind, ProcessError};
pub use pipeline::Pipeline;
pub use registry::{ImageConfig, Purpose, lookup};
pub use types::{AttachmentResult, ProcessedImage, RawImage};

/// Normalize one image with the default pipeline.
pub fn process_image(raw: &RawImage, purpose: Purpose) -> Result<ProcessedImage, ProcessError> {
    Pipeline::new().process_image(raw, purpose)
}

/// Normalize a message attachment with the default pipeline.
pub fn process_attachment_image(raw: &RawImage) -> Result<AttachmentResult, ProcessError> {
    Pipeline::new().process_attachment_image(raw)
}
