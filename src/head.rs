//! Page `<head>` rendering.
//!
//! [`HeadRenderer::render`] maps site config, page metadata and bundled
//! resources to the `<head>` element of one page: title, Open Graph and
//! Twitter Card tags, icon, stylesheets and early scripts.
//!
//! ## Social images
//!
//! When generation is on and the page has a source file, the rendered head
//! points at `static/social-images/{file}.webp` and the caller receives a
//! [`SocialImageJob`] that produces that file. Rendering itself never waits
//! for, and never fails because of, image generation; the URL in the markup
//! is predicted from the file naming scheme.
//!
//! ## Shared state
//!
//! A renderer resolves social image options and creates the font handle on
//! its first render, then reuses both for every later page. Config changes
//! after that first render do not affect them. Fonts themselves load only when
//! the first image job runs (see [`FontHandle`]).
//!
//! ## Tag order
//!
//! | Group | Tags |
//! |---|---|
//! | Document | `title`, `charset`, `viewport` |
//! | Social | `og:site_name`, `og:title`, `og:type`, `twitter:card`, `twitter:title`, `twitter:description`, `og:description`, `og:image:type`, `og:image:alt` |
//! | Image size | `og:image:width`, `og:image:height`, `og:width`, `og:height` (known-size images only) |
//! | URLs | `og:image:url`, `twitter:image`, `og:image`, `twitter:domain`, `og:url`, `twitter:url` (base URL only) |
//! | Site | icon, `description`, `generator`, font preconnects |
//! | Resources | stylesheets, then `beforeDOMReady` scripts, both in input order |

use crate::config::SiteConfig;
use crate::metadata::{
    ImageSource, resolve_description, resolve_file_name, resolve_image_source, resolve_title,
};
use crate::path::{absolute_url, base_url_path, join_segments, path_to_root};
use crate::social::{
    FontHandle, FontResolver, ImageLayout, SOCIAL_IMAGE_DIR, SOCIAL_IMAGE_EXTENSION,
    SocialImageJob, SocialImageOptions, SystemFontResolver,
};
use crate::types::{ExternalResources, JsContent, JsResource, LoadTime, PageData};
use maud::{Markup, PreEscaped, html};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Value of `<meta name="generator">`.
pub const GENERATOR: &str = "pagehead";

/// Favicon location relative to the site root.
pub const ICON_PATH: &str = "static/icon.png";

const FONT_PRECONNECTS: [&str; 2] = ["https://fonts.googleapis.com", "https://fonts.gstatic.com"];

const DEFAULT_SCRIPT_TYPE: &str = "application/javascript";

/// Metadata computed for one page, exposed alongside the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadMeta {
    pub title: String,
    pub description: String,
    /// Social image file name; `None` for pages without a source file.
    pub file_name: Option<String>,
    pub icon_path: String,
    pub image: ImageSource,
    /// Absolute image URL; `None` without a base URL.
    pub image_url: Option<String>,
    /// Canonical page URL; `None` without a base URL.
    pub page_url: Option<String>,
}

/// Output of [`HeadRenderer::render`].
#[derive(Debug)]
pub struct RenderedHead {
    pub markup: Markup,
    pub meta: HeadMeta,
    /// Image the markup refers to, still to be generated.
    pub social_image: Option<SocialImageJob>,
}

/// State fixed by the first render.
struct Resolved {
    enabled: bool,
    options: SocialImageOptions,
    site: Arc<SiteConfig>,
    fonts: Arc<FontHandle>,
}

/// Renders page heads and hands out social image jobs.
///
/// One renderer serves a whole build; it is `Sync`, so pages may be rendered
/// from several threads.
pub struct HeadRenderer {
    output_root: PathBuf,
    resolver: Arc<dyn FontResolver>,
    layout: Option<Arc<dyn ImageLayout>>,
    shared_fonts: Option<Arc<FontHandle>>,
    resolved: OnceLock<Resolved>,
}

impl HeadRenderer {
    /// Renderer writing images under `output_root`, with fonts from `resolver`.
    pub fn new(output_root: impl Into<PathBuf>, resolver: Arc<dyn FontResolver>) -> Self {
        Self {
            output_root: output_root.into(),
            resolver,
            layout: None,
            shared_fonts: None,
            resolved: OnceLock::new(),
        }
    }

    /// Renderer using system fonts plus the config's font directories,
    /// taken relative to `config_dir`.
    pub fn for_config(
        config: &SiteConfig,
        config_dir: &Path,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        let dirs = config.fonts.resolve_dirs(config_dir);
        Self::new(output_root, Arc::new(SystemFontResolver::new(dirs)))
    }

    /// Use a custom image layout instead of the default one.
    pub fn with_layout(mut self, layout: Arc<dyn ImageLayout>) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Share an existing font handle, e.g. across renderers of the same run.
    pub fn with_font_handle(mut self, fonts: Arc<FontHandle>) -> Self {
        self.shared_fonts = Some(fonts);
        self
    }

    /// Directory generated images are written to.
    pub fn image_dir(&self) -> PathBuf {
        self.output_root.join(SOCIAL_IMAGE_DIR)
    }

    /// The font handle, once the first render has created it.
    pub fn font_handle(&self) -> Option<Arc<FontHandle>> {
        self.resolved.get().map(|r| r.fonts.clone())
    }

    fn resolved(&self, config: &SiteConfig) -> &Resolved {
        self.resolved.get_or_init(|| {
            let fonts = self.shared_fonts.clone().unwrap_or_else(|| {
                Arc::new(FontHandle::new(
                    self.resolver.clone(),
                    &config.typography.header,
                    &config.typography.body,
                ))
            });
            let options = SocialImageOptions::resolve(&config.social_images, self.layout.clone());
            tracing::debug!(?options, enabled = config.social_images.is_enabled(), "resolved social image options");
            Resolved {
                enabled: config.social_images.is_enabled(),
                options,
                site: Arc::new(config.clone()),
                fonts,
            }
        })
    }

    /// Render the head for one page.
    pub fn render(
        &self,
        config: &SiteConfig,
        page: &PageData,
        resources: &ExternalResources,
    ) -> RenderedHead {
        let resolved = self.resolved(config);
        let meta = page_meta(config, page, resolved.enabled);

        let social_image = match &meta.file_name {
            Some(file_name) if resolved.enabled => Some(SocialImageJob {
                title: meta.title.clone(),
                description: meta.description.clone(),
                file_name: file_name.clone(),
                output_dir: self.image_dir(),
                options: resolved.options.clone(),
                site: resolved.site.clone(),
                fonts: resolved.fonts.clone(),
            }),
            _ => None,
        };

        let markup = head_markup(config, &meta, &resolved.options, resources);
        RenderedHead {
            markup,
            meta,
            social_image,
        }
    }
}

/// Compute everything the head shows for a page.
pub fn page_meta(config: &SiteConfig, page: &PageData, generation_enabled: bool) -> HeadMeta {
    let title = resolve_title(page);
    let description = resolve_description(page);
    let file_name = resolve_file_name(page);

    let base_dir = if page.slug == "404" {
        base_url_path(config.base_url.as_deref())
    } else {
        path_to_root(&page.slug)
    };
    let icon_path = join_segments(&[&base_dir, ICON_PATH]);

    let image = resolve_image_source(page, file_name.as_deref(), generation_enabled);
    let base_url = config.base_url.as_deref();
    let image_url = base_url.map(|base| image.url(base));
    let page_url = base_url.map(|base| absolute_url(base, &page.slug));

    HeadMeta {
        title,
        description,
        file_name,
        icon_path,
        image,
        image_url,
        page_url,
    }
}

fn script_tag(resource: &JsResource) -> Markup {
    let script_type = resource.module_type.as_deref().unwrap_or(DEFAULT_SCRIPT_TYPE);
    html! {
        @match &resource.content {
            JsContent::External { src } => {
                script src=(src) type=(script_type) spa-preserve {}
            }
            JsContent::Inline { script } => {
                script type=(script_type) spa-preserve { (PreEscaped(script)) }
            }
        }
    }
}

fn head_markup(
    config: &SiteConfig,
    meta: &HeadMeta,
    options: &SocialImageOptions,
    resources: &ExternalResources,
) -> Markup {
    let title = &meta.title;
    let description = &meta.description;
    let image_type = format!("image/{SOCIAL_IMAGE_EXTENSION}");

    html! {
        head {
            title { (title) }
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1.0";
            meta name="og:site_name" content=(config.page_title);
            meta property="og:title" content=(title);
            meta property="og:type" content="website";
            meta name="twitter:card" content="summary_large_image";
            meta name="twitter:title" content=(title);
            meta name="twitter:description" content=(description);
            meta property="og:description" content=(description);
            meta property="og:image:type" content=(image_type);
            meta property="og:image:alt" content=(description);
            @if meta.image.has_known_dimensions() {
                meta property="og:image:width" content=(options.width);
                meta property="og:image:height" content=(options.height);
                meta property="og:width" content=(options.width);
                meta property="og:height" content=(options.height);
            }
            @if let (Some(base_url), Some(image_url), Some(page_url)) =
                (config.base_url.as_deref(), &meta.image_url, &meta.page_url) {
                meta property="og:image:url" content=(image_url);
                meta name="twitter:image" content=(image_url);
                meta property="og:image" content=(image_url);
                meta property="twitter:domain" content=(base_url);
                meta property="og:url" content=(page_url);
                meta property="twitter:url" content=(page_url);
            }
            link rel="icon" href=(meta.icon_path);
            meta name="description" content=(description);
            meta name="generator" content=(GENERATOR);
            @for origin in FONT_PRECONNECTS {
                link rel="preconnect" href=(origin);
            }
            @for href in &resources.css {
                link href=(href) rel="stylesheet" type="text/css" spa-preserve;
            }
            @for resource in resources.js.iter().filter(|r| r.load_time == LoadTime::BeforeDomReady) {
                (script_tag(resource))
            }
        }
    }
}
