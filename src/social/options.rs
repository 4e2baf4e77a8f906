//! Parameter types for social image generation.
//!
//! - [`Quality`] — Lossy encoding quality (1–100). Clamped on construction.
//! - [`SocialImageOptions`] — Effective options after merging the config's
//!   `social_images` setting over the built-in defaults.

use super::layout::{DefaultLayout, ImageLayout};
use crate::config::{ColorSchemeChoice, SocialImagesSetting};
use std::fmt;
use std::sync::Arc;

/// Default social image width, in pixels.
pub const DEFAULT_WIDTH: u32 = 1200;
/// Default social image height, in pixels.
pub const DEFAULT_HEIGHT: u32 = 676;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// Social images are small previews; heavy compression is fine.
pub const SOCIAL_IMAGE_QUALITY: Quality = Quality(40);

/// Effective social image options.
#[derive(Clone)]
pub struct SocialImageOptions {
    pub color_scheme: ColorSchemeChoice,
    pub width: u32,
    pub height: u32,
    pub layout: Arc<dyn ImageLayout>,
}

impl SocialImageOptions {
    /// Built-in defaults: light palette, 1200×676, [`DefaultLayout`].
    pub fn defaults() -> Self {
        Self {
            color_scheme: ColorSchemeChoice::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            layout: Arc::new(DefaultLayout),
        }
    }

    /// Merge the config setting over the defaults. User fields win.
    ///
    /// `layout` replaces the default layout when given; it cannot come from
    /// `config.toml`, only from code embedding the renderer.
    pub fn resolve(setting: &SocialImagesSetting, layout: Option<Arc<dyn ImageLayout>>) -> Self {
        let mut options = Self::defaults();
        if let SocialImagesSetting::Options(overrides) = setting {
            if let Some(scheme) = overrides.color_scheme {
                options.color_scheme = scheme;
            }
            if let Some(width) = overrides.width {
                options.width = width;
            }
            if let Some(height) = overrides.height {
                options.height = height;
            }
        }
        if let Some(layout) = layout {
            options.layout = layout;
        }
        options
    }
}

impl fmt::Debug for SocialImageOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocialImageOptions")
            .field("color_scheme", &self.color_scheme)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layout", &self.layout.name())
            .finish()
    }
}
