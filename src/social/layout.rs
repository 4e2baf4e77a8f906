//! Social image layouts.
//!
//! A layout turns page text into an SVG document at the requested size.
//! Rasterization happens later, so a layout never touches pixels; it only
//! needs to reference font families that exist in the [`FontSet`].

use super::fonts::FontSet;
use crate::config::{ColorScheme, SiteConfig};
use maud::html;

/// Everything a layout may draw from.
pub struct LayoutContext<'a> {
    pub config: &'a SiteConfig,
    pub colors: &'a ColorScheme,
    pub width: u32,
    pub height: u32,
    pub title: &'a str,
    pub description: &'a str,
    pub fonts: &'a FontSet,
}

/// Produces the SVG markup for one social image.
pub trait ImageLayout: Send + Sync {
    /// Short identifier shown in logs.
    fn name(&self) -> &str;

    /// SVG document exactly `ctx.width` × `ctx.height` user units in size.
    fn render(&self, ctx: &LayoutContext<'_>) -> String;
}

/// Title, description and site name on a flat background.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

const TITLE_MAX_LINES: usize = 2;
const DESCRIPTION_MAX_LINES: usize = 4;

/// Average glyph advance relative to font size, for line wrapping.
const GLYPH_WIDTH_RATIO: f32 = 0.55;

/// Wrap `text` into at most `max_lines` lines of roughly `width` pixels.
///
/// When text is cut, the last kept line ends with an ellipsis.
pub fn wrap_lines(text: &str, width: f32, font_size: f32, max_lines: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    let max_chars = ((width / (font_size * GLYPH_WIDTH_RATIO)) as usize).max(1);
    let wrapped = textwrap::wrap(text, max_chars);
    let truncated = wrapped.len() > max_lines;
    let mut lines: Vec<String> = wrapped
        .into_iter()
        .take(max_lines)
        .map(|line| line.into_owned())
        .collect();
    if truncated {
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}

impl ImageLayout for DefaultLayout {
    fn name(&self) -> &str {
        "default"
    }

    fn render(&self, ctx: &LayoutContext<'_>) -> String {
        let (w, h) = (ctx.width as f32, ctx.height as f32);
        let pad = (w * 0.066).round();
        let inner = w - 2.0 * pad;

        let title_size = (h * 0.1).round();
        let body_size = (h * 0.045).round();
        let footer_size = (h * 0.04).round();

        let title_lines = wrap_lines(ctx.title, inner, title_size, TITLE_MAX_LINES);
        let title_top = pad + title_size;
        let title_step = title_size * 1.2;

        let body_top = title_top + title_step * title_lines.len() as f32 + body_size * 0.8;
        let body_step = body_size * 1.4;
        let body_lines = wrap_lines(ctx.description, inner, body_size, DESCRIPTION_MAX_LINES);

        html! {
            svg xmlns="http://www.w3.org/2000/svg"
                width=(ctx.width) height=(ctx.height)
                viewBox=(format!("0 0 {} {}", ctx.width, ctx.height)) {
                rect x="0" y="0" width=(ctx.width) height=(ctx.height) fill=(ctx.colors.light) {}
                @for (i, line) in title_lines.iter().enumerate() {
                    text x=(pad) y=(title_top + title_step * i as f32)
                        font-family=(ctx.fonts.header_family) font-size=(title_size)
                        font-weight="700" fill=(ctx.colors.dark) { (line) }
                }
                @for (i, line) in body_lines.iter().enumerate() {
                    text x=(pad) y=(body_top + body_step * i as f32)
                        font-family=(ctx.fonts.body_family) font-size=(body_size)
                        fill=(ctx.colors.darkgray) { (line) }
                }
                rect x=(pad) y=(h - pad - footer_size * 1.6) width=(inner) height="2"
                    fill=(ctx.colors.lightgray) {}
                text x=(pad) y=(h - pad)
                    font-family=(ctx.fonts.header_family) font-size=(footer_size)
                    font-weight="600" fill=(ctx.colors.secondary) { (ctx.config.page_title) }
            }
        }
        .into_string()
    }
}
