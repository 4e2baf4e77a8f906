//! Raster backend trait and shared types.
//!
//! The [`RasterBackend`] trait defines the two steps between an SVG layout
//! and bytes on disk: rasterize and encode.
//!
//! The production implementation is
//! [`ResvgBackend`](super::resvg_backend::ResvgBackend) — pure Rust, no
//! system libraries beyond installed fonts.

use super::fonts::FontSet;
use super::options::Quality;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("SVG parse failed: {0}")]
    Svg(String),
    #[error("Rasterization failed: {0}")]
    Raster(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Trait for raster backends.
///
/// `Send + Sync` so one backend can serve every job on the rayon pool.
pub trait RasterBackend: Send + Sync {
    /// Render an SVG document into a `width` × `height` RGBA image.
    fn rasterize(
        &self,
        svg: &str,
        width: u32,
        height: u32,
        fonts: &FontSet,
    ) -> Result<RgbaImage, BackendError>;

    /// Encode an image as lossy WebP.
    fn encode(&self, image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without rendering anything.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        /// When set, `rasterize` fails with this message.
        pub fail_rasterize: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Rasterize {
            svg: String,
            width: u32,
            height: u32,
            header_family: String,
        },
        Encode {
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing(message: &str) -> Self {
            Self {
                operations: Mutex::new(Vec::new()),
                fail_rasterize: Some(message.to_string()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl RasterBackend for MockBackend {
        fn rasterize(
            &self,
            svg: &str,
            width: u32,
            height: u32,
            fonts: &FontSet,
        ) -> Result<RgbaImage, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Rasterize {
                svg: svg.to_string(),
                width,
                height,
                header_family: fonts.header_family.clone(),
            });
            match &self.fail_rasterize {
                Some(message) => Err(BackendError::Raster(message.clone())),
                None => Ok(RgbaImage::new(width, height)),
            }
        }

        fn encode(&self, image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                width: image.width(),
                height: image.height(),
                quality: quality.value(),
            });
            Ok(b"RIFFmock".to_vec())
        }
    }

    fn fonts() -> FontSet {
        FontSet {
            db: std::sync::Arc::new(resvg::usvg::fontdb::Database::new()),
            header_family: "H".into(),
            body_family: "B".into(),
        }
    }

    #[test]
    fn mock_records_rasterize_and_encode() {
        let backend = MockBackend::new();
        let image = backend.rasterize("<svg/>", 40, 20, &fonts()).unwrap();
        backend.encode(&image, Quality::new(40)).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(
            &ops[0],
            RecordedOp::Rasterize { width: 40, height: 20, header_family, .. } if header_family == "H"
        ));
        assert_eq!(
            ops[1],
            RecordedOp::Encode {
                width: 40,
                height: 20,
                quality: 40
            }
        );
    }

    #[test]
    fn mock_failure_is_raster_error() {
        let backend = MockBackend::failing("boom");
        let err = backend.rasterize("<svg/>", 1, 1, &fonts()).unwrap_err();
        assert!(matches!(err, BackendError::Raster(m) if m == "boom"));
    }
}
