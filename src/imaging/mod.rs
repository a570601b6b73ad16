//! Raster codec layer. No system libraries required.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::ImageReader::into_dimensions` |
//! | **Decode** | `image` crate decoders (first frame for GIF) |
//! | **Scale / cover crop** | centered `crop_imm` in source space, then Lanczos3 `resize_exact` |
//! | **Encode** | JPEG (quality, alpha flattened onto white), PNG (best compression), WebP (lossy, quality) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing codec operations
//! - **Backend**: [`RasterCodec`] trait + [`RustCodec`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Decoded, Dimensions, RasterCodec};
pub use calculations::{calculate_fit_dimensions, cover_crop_window, exceeds_edge, fits_within};
pub use params::{DrawMode, DrawParams, OutputFormat, Quality};
pub use rust_backend::{RustCodec, sniff_mime};
