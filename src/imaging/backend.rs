//! Raster codec trait and shared types.
//!
//! The [`RasterCodec`] trait is the narrow capability the pipeline needs from
//! a rendering backend: probe dimensions, decode to a surface, draw a surface
//! scaled into a box, and encode a surface. Everything above this trait
//! (thresholds, policy selection, error classification) is backend-agnostic
//! and runs unchanged against the recording mock in [`tests`].
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.
//!
//! Surfaces are plain owned values. Whatever a backend acquires to decode or
//! render is released when the surface is dropped, so every early return in
//! the pipeline releases it too.

use super::params::{DrawParams, OutputFormat, Quality};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to read dimensions: {0}")]
    Probe(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to draw image: {0}")]
    Draw(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn longest_edge(self) -> u32 {
        self.width.max(self.height)
    }
}

/// A decoded (or drawn) surface together with its measured size.
#[derive(Debug)]
pub struct Decoded<S> {
    pub dimensions: Dimensions,
    pub surface: S,
}

/// Trait for raster codec backends.
///
/// `Sync` so one codec can serve concurrent thumbnail and full-size work.
pub trait RasterCodec: Sync {
    /// Backend-specific decoded pixel storage.
    type Surface;

    /// Read pixel dimensions without a full decode where the format allows it.
    fn probe(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode bytes into a surface. For animated inputs this is the first frame.
    fn decode(&self, bytes: &[u8]) -> Result<Decoded<Self::Surface>, BackendError>;

    /// Render `surface` into the target box.
    fn draw_scaled(
        &self,
        surface: &Self::Surface,
        params: &DrawParams,
    ) -> Result<Decoded<Self::Surface>, BackendError>;

    /// Encode a surface.
    fn encode(
        &self,
        surface: &Self::Surface,
        format: OutputFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::DrawMode;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MAGIC: &[u8; 4] = b"MOCK";
    const HEADER_LEN: usize = 12;

    /// Build a synthetic mock image: `MOCK` + width + height (LE u32), zero
    /// padded to `size` bytes.
    pub fn mock_image(width: u32, height: u32, size: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(size.max(HEADER_LEN));
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&width.to_le_bytes());
        bytes.extend_from_slice(&height.to_le_bytes());
        bytes.resize(size.max(HEADER_LEN), 0);
        bytes
    }

    /// Parse the header written by [`mock_image`].
    pub fn mock_dimensions(bytes: &[u8]) -> Option<Dimensions> {
        if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
            return None;
        }
        let width = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let height = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        Some(Dimensions { width, height })
    }

    /// Deterministic encoded size so compression ratios are predictable.
    pub fn mock_encoded_len(dims: Dimensions, quality: Quality) -> usize {
        let pixels = dims.width as usize * dims.height as usize;
        HEADER_LEN + pixels * quality.value() as usize / 100 / 16
    }

    /// Mock surface that tracks how many surfaces are alive.
    #[derive(Debug)]
    pub struct MockSurface {
        pub dimensions: Dimensions,
        live: Arc<AtomicUsize>,
    }

    impl MockSurface {
        fn new(dimensions: Dimensions, live: &Arc<AtomicUsize>) -> Self {
            live.fetch_add(1, Ordering::SeqCst);
            Self {
                dimensions,
                live: Arc::clone(live),
            }
        }
    }

    impl Drop for MockSurface {
        fn drop(&mut self) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Probe,
        Decode {
            width: u32,
            height: u32,
        },
        Draw {
            width: u32,
            height: u32,
            mode: DrawMode,
        },
        Encode {
            width: u32,
            height: u32,
            format: OutputFormat,
            quality: u32,
        },
    }

    /// Mock codec that records operations and fabricates deterministic output.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon::join.
    #[derive(Default)]
    pub struct MockCodec {
        pub operations: Mutex<Vec<RecordedOp>>,
        pub fail_probe: bool,
        pub fail_decode: bool,
        pub fail_encode: bool,
        live: Arc<AtomicUsize>,
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_probe() -> Self {
            Self {
                fail_probe: true,
                ..Self::default()
            }
        }

        pub fn failing_decode() -> Self {
            Self {
                fail_decode: true,
                ..Self::default()
            }
        }

        pub fn failing_encode() -> Self {
            Self {
                fail_encode: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn live_surfaces(&self) -> usize {
            self.live.load(Ordering::SeqCst)
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl RasterCodec for MockCodec {
        type Surface = MockSurface;

        fn probe(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
            self.record(RecordedOp::Probe);
            if self.fail_probe {
                return Err(BackendError::Probe("mock probe failure".into()));
            }
            mock_dimensions(bytes).ok_or_else(|| BackendError::Probe("not a mock image".into()))
        }

        fn decode(&self, bytes: &[u8]) -> Result<Decoded<MockSurface>, BackendError> {
            if self.fail_decode {
                return Err(BackendError::Decode("mock decode failure".into()));
            }
            let dimensions =
                mock_dimensions(bytes).ok_or_else(|| BackendError::Decode("not a mock image".into()))?;
            self.record(RecordedOp::Decode {
                width: dimensions.width,
                height: dimensions.height,
            });
            Ok(Decoded {
                dimensions,
                surface: MockSurface::new(dimensions, &self.live),
            })
        }

        fn draw_scaled(
            &self,
            _surface: &MockSurface,
            params: &DrawParams,
        ) -> Result<Decoded<MockSurface>, BackendError> {
            self.record(RecordedOp::Draw {
                width: params.width,
                height: params.height,
                mode: params.mode,
            });
            let dimensions = Dimensions::new(params.width, params.height);
            Ok(Decoded {
                dimensions,
                surface: MockSurface::new(dimensions, &self.live),
            })
        }

        fn encode(
            &self,
            surface: &MockSurface,
            format: OutputFormat,
            quality: Quality,
        ) -> Result<Vec<u8>, BackendError> {
            self.record(RecordedOp::Encode {
                width: surface.dimensions.width,
                height: surface.dimensions.height,
                format,
                quality: quality.value(),
            });
            if self.fail_encode {
                return Err(BackendError::Encode("mock encode failure".into()));
            }
            let dims = surface.dimensions;
            Ok(mock_image(
                dims.width,
                dims.height,
                mock_encoded_len(dims, quality),
            ))
        }
    }

    #[test]
    fn mock_image_roundtrips_header() {
        let bytes = mock_image(800, 600, 2048);
        assert_eq!(bytes.len(), 2048);
        assert_eq!(mock_dimensions(&bytes), Some(Dimensions::new(800, 600)));
        assert_eq!(mock_dimensions(b"nope"), None);
    }

    #[test]
    fn mock_records_probe() {
        let codec = MockCodec::new();
        let dims = codec.probe(&mock_image(1920, 1080, 64)).unwrap();
        assert_eq!(dims, Dimensions::new(1920, 1080));
        assert_eq!(codec.get_operations(), vec![RecordedOp::Probe]);
    }

    #[test]
    fn mock_surfaces_release_on_drop() {
        let codec = MockCodec::new();
        {
            let decoded = codec.decode(&mock_image(10, 10, 64)).unwrap();
            let drawn = codec
                .draw_scaled(
                    &decoded.surface,
                    &DrawParams {
                        width: 5,
                        height: 5,
                        mode: DrawMode::Scale,
                    },
                )
                .unwrap();
            assert_eq!(drawn.dimensions, Dimensions::new(5, 5));
            assert_eq!(codec.live_surfaces(), 2);
        }
        assert_eq!(codec.live_surfaces(), 0);
    }

    #[test]
    fn mock_encode_is_redecodable() {
        let codec = MockCodec::new();
        let decoded = codec.decode(&mock_image(300, 200, 64)).unwrap();
        let bytes = codec
            .encode(&decoded.surface, OutputFormat::Jpeg, Quality::new(80))
            .unwrap();
        assert_eq!(mock_dimensions(&bytes), Some(Dimensions::new(300, 200)));
        assert_eq!(bytes.len(), 12 + 300 * 200 * 80 / 100 / 16);
    }

    #[test]
    fn mock_failing_encode_errors() {
        let codec = MockCodec::failing_encode();
        let decoded = codec.decode(&mock_image(10, 10, 64)).unwrap();
        let result = codec.encode(&decoded.surface, OutputFormat::Png, Quality::default());
        assert!(matches!(result, Err(BackendError::Encode(_))));
    }

    #[test]
    fn dimensions_longest_edge() {
        assert_eq!(Dimensions::new(1600, 1200).longest_edge(), 1600);
        assert_eq!(Dimensions::new(10, 30).as_tuple(), (10, 30));
    }
}
