//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every page is its semantic identity — positional index and title —
//! with paths shown as secondary context on indented lines.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! 001 Welcome to the Garden → index.head.html
//!     Image: static/social-images/index.webp (generated)
//! 002 Borrowing → notes/borrowing.head.html
//!     Image: static/borrow-checker.png (frontmatter cover)
//! 003 Tag: rust → tags/rust.head.html
//!     Image: static/og-image.png (default)
//!
//! Explorer → static/explorer.js
//! Rendered 3 heads, 1 social image scheduled
//! ```
//!
//! ## Social images
//!
//! ```text
//!     index → static/social-images/index.webp
//!     notes-a: failed (Raster error: ...)
//! Generated 1 social image, 1 failed
//! ```
//!
//! ## Check
//!
//! ```text
//! Pages
//! 001 Welcome to the Garden
//!     Source: index
//!     Description: Notes on Rust, ownership & friends
//! 002 Tag: rust
//!     Source: (generated)
//!
//! Warning: slug "tags" is used by 2 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure — no I/O, no side effects.

use crate::metadata::{ImageSource, resolve_description, resolve_title};
use crate::pipeline::{Manifest, ManifestIssue, SiteRender};
use crate::social::{JobOutcome, SocialImageEvent};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Display a path relative to `root` when it lives under it.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Count with a singular/plural noun: `1 head`, `2 heads`.
fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn image_origin(image: &ImageSource) -> String {
    match image {
        ImageSource::Frontmatter { key, .. } => format!("frontmatter {key}"),
        ImageSource::Default => "default".to_string(),
        ImageSource::Generated { .. } => "generated".to_string(),
    }
}

// ============================================================================
// Render
// ============================================================================

/// Format the result of rendering every page head.
pub fn format_render_output(site: &SiteRender, output_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in site.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            page.meta.title,
            relative(&page.head_path, output_dir)
        ));
        lines.push(format!(
            "{}Image: {} ({})",
            indent(1),
            page.meta.image.site_path(),
            image_origin(&page.meta.image)
        ));
    }

    lines.push(String::new());
    if let Some(script) = &site.explorer_script {
        lines.push(format!("Explorer \u{2192} {}", relative(script, output_dir)));
    }
    lines.push(format!(
        "Rendered {}, {} scheduled",
        plural(site.pages.len(), "head"),
        plural(site.jobs.len(), "social image")
    ));
    lines
}

pub fn print_render_output(site: &SiteRender, output_dir: &Path) {
    for line in format_render_output(site, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Social images
// ============================================================================

/// Format a single social image progress event.
pub fn format_social_event(event: &SocialImageEvent, output_dir: &Path) -> Vec<String> {
    match event {
        SocialImageEvent::Generated { file_name, path } => vec![format!(
            "{}{} \u{2192} {}",
            indent(1),
            file_name,
            relative(path, output_dir)
        )],
        SocialImageEvent::Failed { file_name, error } => {
            vec![format!("{}{}: failed ({})", indent(1), file_name, error)]
        }
    }
}

/// One-line summary of a finished image batch.
pub fn format_social_summary(outcomes: &[JobOutcome]) -> String {
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let generated = plural(outcomes.len() - failed, "social image");
    if failed == 0 {
        format!("Generated {generated}")
    } else {
        format!("Generated {generated}, {failed} failed")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the page inventory and any problems found by the check command.
pub fn format_check_output(manifest: &Manifest, issues: &[ManifestIssue]) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];

    for (i, entry) in manifest.pages.iter().enumerate() {
        let page = &entry.page;
        lines.push(format!("{} {}", format_index(i + 1), resolve_title(page)));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            page.file_path.as_deref().unwrap_or("(generated)")
        ));
        let description = resolve_description(page);
        if !description.is_empty() {
            lines.push(format!(
                "{}Description: {}",
                indent(1),
                truncate_desc(&description, 60)
            ));
        }
    }

    if !issues.is_empty() {
        lines.push(String::new());
        for issue in issues {
            lines.push(format!("Warning: {issue}"));
        }
    }
    lines
}

pub fn print_check_output(manifest: &Manifest, issues: &[ManifestIssue]) {
    for line in format_check_output(manifest, issues) {
        println!("{}", line);
    }
}
