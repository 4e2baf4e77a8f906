//! Slug and URL helpers used by the head renderer.
//!
//! Slugs are `/`-separated, have no leading slash and no extension
//! (`notes/rust`, `index`, `404`). Relative links out of a page are computed
//! from slug depth, the same way the page templates do it.

use url::Url;

/// Host used when the config has no `base_url` and a URL still has to be parsed.
const FALLBACK_HOST: &str = "example.com";

/// Filesystem-safe image name for a page: every path separator becomes `-`.
///
/// `notes/rust/ownership` → `notes-rust-ownership`
pub fn social_file_name(file_path: &str) -> String {
    file_path.replace(['/', '\\'], "-")
}

/// Relative path from a page back to the site root.
///
/// - `index` → `.`
/// - `notes/rust` → `..`
/// - `a/b/c` → `../..`
pub fn path_to_root(slug: &str) -> String {
    let segments: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
    let depth = segments.len().saturating_sub(1);
    if depth == 0 {
        ".".to_string()
    } else {
        vec![".."; depth].join("/")
    }
}

/// Join URL path segments with single slashes.
///
/// Keeps a leading slash if the first segment has one and a trailing slash if
/// the last segment has one. Empty and bare `/` segments are dropped.
pub fn join_segments(segments: &[&str]) -> String {
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return String::new();
    };

    let mut joined = segments
        .iter()
        .filter(|s| !s.is_empty() && **s != "/")
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if first.starts_with('/') {
        joined.insert(0, '/');
    }
    if last.ends_with('/') && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

/// Path component of the site's public URL (`"example.com/garden"` → `/garden`).
///
/// Falls back to `/` when there is no base URL or it doesn't parse.
pub fn base_url_path(base_url: Option<&str>) -> String {
    let host = base_url.unwrap_or(FALLBACK_HOST);
    Url::parse(&format!("https://{host}"))
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

/// Absolute `https://` URL for a path under the site root.
pub fn absolute_url(base_url: &str, path: &str) -> String {
    format!("https://{base_url}/{path}")
}
