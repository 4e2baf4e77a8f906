//! Batch rendering of a whole site's heads from a page manifest.
//!
//! The upstream site build describes its pages in a JSON manifest; this
//! module renders every head to `{output}/{slug}.head.html`, installs the
//! explorer script and collects the social image jobs. Running the jobs is
//! left to the caller (see [`crate::social::generate_all`]).
//!
//! ## Manifest
//!
//! ```json
//! {
//!   "resources": { "css": ["index.css"], "js": [] },
//!   "pages": [
//!     {
//!       "file_path": "notes/rust",
//!       "slug": "notes/rust",
//!       "frontmatter": { "title": "Rust" },
//!       "description": "Notes on Rust",
//!       "resources": { "css": ["index.css", "notes.css"] }
//!     }
//!   ]
//! }
//! ```
//!
//! `resources` at the top level apply to every page; a page's own
//! `resources` replace them entirely.

use crate::config::{ConfigError, SiteConfig};
use crate::explorer;
use crate::head::{HeadMeta, HeadRenderer};
use crate::metadata::resolve_file_name;
use crate::social::SocialImageJob;
use crate::types::{ExternalResources, PageData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Extension of rendered head fragments.
pub const HEAD_EXTENSION: &str = "head.html";

/// Where the explorer script is installed, relative to the output root.
pub const EXPLORER_SCRIPT_PATH: &str = "static/explorer.js";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: ExternalResources,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEntry {
    #[serde(flatten)]
    pub page: PageData,
    /// Replaces the manifest-wide resources for this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ExternalResources>,
}

impl Manifest {
    pub fn resources_for<'a>(&'a self, entry: &'a PageEntry) -> &'a ExternalResources {
        entry.resources.as_ref().unwrap_or(&self.resources)
    }
}

pub fn load_manifest(path: &Path) -> Result<Manifest, PipelineError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Output file for a slug. Empty slugs and folder slugs (`tags/`) map to `index`.
pub fn head_path(output_dir: &Path, slug: &str) -> PathBuf {
    let slug = slug.trim_start_matches('/');
    let name = if slug.is_empty() || slug.ends_with('/') {
        format!("{slug}index")
    } else {
        slug.to_string()
    };
    output_dir.join(format!("{name}.{HEAD_EXTENSION}"))
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub slug: String,
    pub meta: HeadMeta,
    pub head_path: PathBuf,
    /// Path the page's social image will be written to, if one is scheduled.
    pub image_path: Option<PathBuf>,
}

/// Result of [`render_site`].
#[derive(Debug, Default)]
pub struct SiteRender {
    pub pages: Vec<RenderedPage>,
    pub explorer_script: Option<PathBuf>,
    pub jobs: Vec<SocialImageJob>,
}

/// Render and write every page head in manifest order.
pub fn render_site(
    config: &SiteConfig,
    manifest: &Manifest,
    renderer: &HeadRenderer,
    output_dir: &Path,
) -> Result<SiteRender, PipelineError> {
    let mut result = SiteRender::default();

    for entry in &manifest.pages {
        let head = renderer.render(config, &entry.page, manifest.resources_for(entry));
        let path = head_path(output_dir, &entry.page.slug);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, head.markup.into_string())?;
        tracing::debug!(slug = %entry.page.slug, path = %path.display(), "head written");

        let image_path = head.social_image.as_ref().map(SocialImageJob::output_path);
        result.pages.push(RenderedPage {
            slug: entry.page.slug.clone(),
            meta: head.meta,
            head_path: path,
            image_path,
        });
        result.jobs.extend(head.social_image);
    }

    result.explorer_script = Some(write_explorer_script(output_dir)?);
    Ok(result)
}

/// Install the explorer script under the output root.
pub fn write_explorer_script(output_dir: &Path) -> Result<PathBuf, PipelineError> {
    let path = output_dir.join(EXPLORER_SCRIPT_PATH);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, explorer::SCRIPT)?;
    Ok(path)
}

/// Problems found by [`check_manifest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestIssue {
    /// Several pages render to the same head file.
    DuplicateSlug { slug: String, count: usize },
    /// Several source files map to the same social image name
    /// (`a/b` and `a-b` both become `a-b`).
    ImageNameCollision { file_name: String, file_paths: Vec<String> },
}

impl std::fmt::Display for ManifestIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSlug { slug, count } => {
                write!(f, "slug \"{slug}\" is used by {count} pages")
            }
            Self::ImageNameCollision {
                file_name,
                file_paths,
            } => write!(
                f,
                "social image \"{file_name}\" is shared by {}",
                file_paths.join(", ")
            ),
        }
    }
}

/// Find pages that would overwrite each other's output.
pub fn check_manifest(manifest: &Manifest) -> Vec<ManifestIssue> {
    let mut slugs: BTreeMap<&str, usize> = BTreeMap::new();
    let mut images: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in &manifest.pages {
        *slugs.entry(entry.page.slug.as_str()).or_default() += 1;
        if let (Some(file_name), Some(file_path)) =
            (resolve_file_name(&entry.page), entry.page.file_path.as_ref())
        {
            images.entry(file_name).or_default().push(file_path.clone());
        }
    }

    let duplicate_slugs = slugs
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(slug, count)| ManifestIssue::DuplicateSlug {
            slug: slug.to_string(),
            count,
        });
    let collisions = images
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(file_name, file_paths)| ManifestIssue::ImageNameCollision {
            file_name,
            file_paths,
        });

    duplicate_slugs.chain(collisions).collect()
}
