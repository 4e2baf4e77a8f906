//! Page metadata resolution for the head.
//!
//! Title, description and social image each come from several sources. Every
//! field is resolved from an ordered table of candidates.
//!
//! ## Description
//!
//! | # | Source | Treatment |
//! |---|--------|-----------|
//! | 1 | frontmatter `socialDescription` | verbatim |
//! | 2 | page description (trimmed) | HTML entities decoded |
//! | 3 | — | empty string |
//!
//! The explicit social description is written by hand for sharing, so it
//! always beats the description derived from the page body.
//!
//! ## Social image
//!
//! | # | Source | URL |
//! |---|--------|-----|
//! | 1 | frontmatter `socialImage` | `https://{base}/static/{value}` |
//! | 2 | frontmatter `image` | same |
//! | 3 | frontmatter `cover` | same |
//! | 4 | frontmatter `socialImageUrl` | same |
//! | 5 | generation off, or page has no source file | `https://{base}/static/og-image.png` |
//! | 6 | otherwise | `https://{base}/static/social-images/{file}.webp` |
//!
//! Rows 1–4 stop at the first alias that is *present*, even if it is empty.
//! An empty value then counts as no frontmatter image and falls through to
//! rows 5–6; later aliases are not consulted.
//!
//! Rows 5 and 6 point at images whose size we know; a frontmatter image has
//! unknown dimensions.

use crate::escape::unescape_html;
use crate::path::{absolute_url, social_file_name};
use crate::social::{SOCIAL_IMAGE_EXTENSION, SOCIAL_IMAGE_DIR};
use crate::types::PageData;

/// Title used when the frontmatter has none.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Fallback social image, relative to the site root.
pub const DEFAULT_IMAGE_PATH: &str = "static/og-image.png";

/// Page title: frontmatter title or [`DEFAULT_TITLE`].
pub fn resolve_title(page: &PageData) -> String {
    page.frontmatter
        .as_ref()
        .and_then(|fm| fm.title.clone())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Page description per the table in the module docs.
pub fn resolve_description(page: &PageData) -> String {
    let social = page
        .frontmatter
        .as_ref()
        .and_then(|fm| fm.social_description.as_deref())
        .filter(|s| !s.is_empty())
        .map(String::from);

    let derived = page
        .description
        .as_deref()
        .map(str::trim)
        .filter(|desc| !desc.is_empty())
        .map(|desc| unescape_html(desc).into_owned());

    [social, derived].into_iter().flatten().next().unwrap_or_default()
}

/// Image file name (without extension) for a page; `None` for generated pages.
pub fn resolve_file_name(page: &PageData) -> Option<String> {
    page.file_path.as_deref().map(social_file_name)
}

/// Where a page's social preview image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Path under `static/` named by a frontmatter alias.
    Frontmatter { key: &'static str, path: String },
    /// The site-wide fallback image.
    Default,
    /// The image generated for this page, identified by its file name.
    Generated { file_name: String },
}

impl ImageSource {
    /// Path relative to the site root.
    pub fn site_path(&self) -> String {
        match self {
            Self::Frontmatter { path, .. } => format!("static/{path}"),
            Self::Default => DEFAULT_IMAGE_PATH.to_string(),
            Self::Generated { file_name } => {
                format!("{SOCIAL_IMAGE_DIR}/{file_name}.{SOCIAL_IMAGE_EXTENSION}")
            }
        }
    }

    /// Public URL for the image under the given base URL.
    pub fn url(&self, base_url: &str) -> String {
        absolute_url(base_url, &self.site_path())
    }

    /// Whether the image's pixel size is known (and may be advertised).
    pub fn has_known_dimensions(&self) -> bool {
        !matches!(self, Self::Frontmatter { .. })
    }
}

/// Social image source per the table in the module docs.
pub fn resolve_image_source(
    page: &PageData,
    file_name: Option<&str>,
    generation_enabled: bool,
) -> ImageSource {
    let from_frontmatter = page.frontmatter.as_ref().and_then(|fm| {
        fm.image_aliases()
            .into_iter()
            .find_map(|(key, value)| value.map(|v| (key, v)))
            .filter(|(_, path)| !path.is_empty())
            .map(|(key, path)| ImageSource::Frontmatter {
                key,
                path: path.to_string(),
            })
    });

    let fallback = match file_name {
        Some(file_name) if generation_enabled => ImageSource::Generated {
            file_name: file_name.to_string(),
        },
        _ => ImageSource::Default,
    };

    from_frontmatter.unwrap_or(fallback)
}
