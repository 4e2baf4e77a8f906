//! # pagehead
//!
//! Renders the `<head>` of every page of a static site, with search and
//! social-sharing metadata, and produces a social preview image per page.
//! Also ships the small browser script behind the collapsible explorer panel.
//!
//! # Architecture: Render, Then Generate
//!
//! ```text
//! 1. Render    config + pages.json  →  {slug}.head.html    (pure, synchronous)
//!                                   →  social image jobs
//! 2. Generate  jobs                 →  static/social-images/*.webp  (parallel)
//! ```
//!
//! Rendering never waits for an image. The head refers to the image's
//! predicted URL and the job is handed back to the caller, who decides when
//! and how many to run at once. The CLI runs them all on a rayon pool sized by
//! `processing.max_processes`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`head`] | `HeadRenderer` — page data → `<head>` markup + optional image job |
//! | [`metadata`] | Title, description and image source resolution tables |
//! | [`social`] | Social image options, fonts, SVG layout, rasterize + WebP encode |
//! | [`explorer`] | Explorer panel script and markup |
//! | [`pipeline`] | Page manifest loading, batch rendering, collision checks |
//! | [`config`] | `config.toml` loading, validation and merging over stock defaults |
//! | [`types`] | Page and resource types handed over by the site build |
//! | [`path`] | Slug, relative path and URL helpers |
//! | [`escape`] | HTML entity decoding for upstream descriptions |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Jobs Instead of Fire-and-Forget
//!
//! Image generation is returned as a [`social::SocialImageJob`] instead of
//! being started inside the renderer. Errors reach whoever runs the job, and
//! large sites no longer start one image per page all at once.
//!
//! ## Fonts Load Once, Lazily
//!
//! Font discovery is by far the slowest step of image generation. A
//! [`social::FontHandle`] is created per renderer, shared by all of its jobs,
//! and resolves the font database on the first job to need it. A run without
//! images never scans font directories.
//!
//! ## Maud for Markup and SVG
//!
//! The head and the default image layout are both written with
//! [Maud](https://maud.lambda.xyz/): compile-time checked and escaped by
//! default, so page titles can never break out of an attribute.
//!
//! ## Pure-Rust Rendering
//!
//! SVG is rasterized with `resvg` and encoded with `webp`. No headless
//! browser, no Node, no ImageMagick.

pub mod config;
pub mod escape;
pub mod explorer;
pub mod head;
pub mod metadata;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod social;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
