//! Social preview images — SVG layout, rasterized and encoded in pure Rust.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Layout** | [`ImageLayout`] → SVG string (maud) |
//! | **Fonts** | `usvg::fontdb`, resolved once per run |
//! | **Rasterize** | `usvg::Tree::from_str` + `resvg::render` |
//! | **Encode → WebP** | `webp::Encoder`, quality 40 |
//!
//! The module is split into:
//! - **Options**: Defaults merged with the config's `social_images` table
//! - **Fonts**: [`FontResolver`] trait + lazily shared [`FontHandle`]
//! - **Layout**: [`ImageLayout`] trait + [`DefaultLayout`]
//! - **Backend**: [`RasterBackend`] trait + [`ResvgBackend`]
//! - **Generate**: [`SocialImageJob`], single and batch generation

pub mod backend;
pub mod fonts;
pub mod generate;
pub mod layout;
mod options;
pub mod resvg_backend;

/// Output directory for generated images, relative to the site root.
pub const SOCIAL_IMAGE_DIR: &str = "static/social-images";
/// File extension of generated images.
pub const SOCIAL_IMAGE_EXTENSION: &str = "webp";

pub use backend::{BackendError, RasterBackend};
pub use fonts::{FontHandle, FontResolver, FontSet, SystemFontResolver};
pub use generate::{
    JobOutcome, SocialImageError, SocialImageEvent, SocialImageGenerator, SocialImageJob,
    generate_all,
};
pub use layout::{DefaultLayout, ImageLayout, LayoutContext};
pub use options::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Quality, SOCIAL_IMAGE_QUALITY, SocialImageOptions};
pub use resvg_backend::ResvgBackend;
