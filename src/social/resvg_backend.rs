//! Pure Rust raster backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Parse SVG | `usvg::Tree::from_str` with the run's font database |
//! | Rasterize | `resvg::render` into a `tiny_skia::Pixmap` |
//! | Unpremultiply | `PremultipliedColorU8::demultiply` → `image::RgbaImage` |
//! | Encode → WebP | `webp::Encoder::from_rgba` (lossy) |

use super::backend::{BackendError, RasterBackend};
use super::fonts::FontSet;
use super::options::Quality;
use image::RgbaImage;
use resvg::{tiny_skia, usvg};

/// Backend built on `resvg` and `libwebp`.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgBackend;

impl ResvgBackend {
    pub fn new() -> Self {
        Self
    }
}

impl RasterBackend for ResvgBackend {
    fn rasterize(
        &self,
        svg: &str,
        width: u32,
        height: u32,
        fonts: &FontSet,
    ) -> Result<RgbaImage, BackendError> {
        let options = usvg::Options {
            fontdb: fonts.db.clone(),
            ..Default::default()
        };
        let tree =
            usvg::Tree::from_str(svg, &options).map_err(|e| BackendError::Svg(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            BackendError::Raster(format!("cannot allocate {width}x{height} pixmap"))
        })?;

        // Stretch the document to the requested size if the layout drew it differently
        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let raw: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        RgbaImage::from_raw(width, height, raw)
            .ok_or_else(|| BackendError::Raster("pixel buffer size mismatch".to_string()))
    }

    fn encode(&self, image: &RgbaImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(BackendError::Encode("cannot encode an empty image".to_string()));
        }
        let encoder = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height());
        Ok(encoder.encode(quality.value() as f32).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::usvg::fontdb::Database;
    use std::sync::Arc;

    fn fonts() -> FontSet {
        FontSet {
            db: Arc::new(Database::new()),
            header_family: "sans-serif".into(),
            body_family: "sans-serif".into(),
        }
    }

    const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn rasterize_fills_pixels() {
        let image = ResvgBackend::new()
            .rasterize(RED_SQUARE, 10, 10, &fonts())
            .unwrap();
        assert_eq!(image.dimensions(), (10, 10));
        assert_eq!(image.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn rasterize_scales_to_requested_size() {
        let image = ResvgBackend::new()
            .rasterize(RED_SQUARE, 40, 20, &fonts())
            .unwrap();
        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(image.get_pixel(39, 19).0, [255, 0, 0, 255]);
    }

    #[test]
    fn rasterize_rejects_bad_svg() {
        let err = ResvgBackend::new()
            .rasterize("not svg", 10, 10, &fonts())
            .unwrap_err();
        assert!(matches!(err, BackendError::Svg(_)));
    }

    #[test]
    fn rasterize_rejects_zero_size() {
        let err = ResvgBackend::new()
            .rasterize(RED_SQUARE, 0, 10, &fonts())
            .unwrap_err();
        assert!(matches!(err, BackendError::Raster(_)));
    }

    #[test]
    fn encode_produces_decodable_webp() {
        let backend = ResvgBackend::new();
        let image = backend.rasterize(RED_SQUARE, 32, 18, &fonts()).unwrap();
        let bytes = backend.encode(&image, Quality::new(40)).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 18));
    }

    #[test]
    fn lower_quality_is_smaller() {
        let backend = ResvgBackend::new();
        // Noisy content so quality actually matters
        let image = RgbaImage::from_fn(64, 64, |x, y| {
            image::Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) * 5 % 256) as u8, 255])
        });
        let low = backend.encode(&image, Quality::new(10)).unwrap();
        let high = backend.encode(&image, Quality::new(95)).unwrap();
        assert!(low.len() < high.len());
    }
}
