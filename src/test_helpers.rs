//! Shared test utilities for the pagehead test suite.
//!
//! Provides fixture setup plus small builders and lookups for manifest and
//! render-result data.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = load_fixture_config(&tmp);
//! let manifest = load_manifest(&tmp.path().join("pages.json")).unwrap();
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, SiteConfig};
use crate::pipeline::{PageEntry, RenderedPage, SiteRender};
use crate::types::PageData;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in std::fs::read_dir(&fixtures).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), tmp.path().join(entry.file_name())).unwrap();
    }
    tmp
}

/// Load the fixture `config.toml` merged over stock defaults.
pub fn load_fixture_config(tmp: &TempDir) -> SiteConfig {
    config::load_config(tmp.path()).unwrap()
}

// =========================================================================
// Builders and lookups
// =========================================================================

/// Manifest entry with no frontmatter and no resource override.
pub fn entry(file_path: Option<&str>, slug: &str) -> PageEntry {
    PageEntry {
        page: PageData {
            file_path: file_path.map(String::from),
            slug: slug.to_string(),
            ..Default::default()
        },
        resources: None,
    }
}

/// Find a rendered page by slug. Panics if not found.
pub fn find_rendered<'a>(site: &'a SiteRender, slug: &str) -> &'a RenderedPage {
    site.pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| panic!("page '{}' not found", slug))
}
