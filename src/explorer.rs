//! Collapsible file-explorer panel.
//!
//! The behavior lives in a small browser script, `static/explorer.js`,
//! embedded at compile time. Pages include it as an `afterDOMReady` resource
//! and render the panel with [`render_explorer`].
//!
//! ## DOM contract
//!
//! - A header element with `id="explorer"`, immediately followed by the
//!   content element it collapses.
//! - The page-transition layer dispatches a `nav` event on `document` after
//!   every client-side navigation (and once on first load).
//!
//! ## States
//!
//! | State | Content `max-height` | `collapsed` class |
//! |---|---|---|
//! | Expanded (initial) | `scrollHeight` px | absent |
//! | Collapsed | `0px` | on header and content |
//!
//! Clicking the header switches state. `nav` and `resize` re-run setup, which
//! re-measures the content and rebinds the click handler exactly once.

use crate::types::{JsContent, JsResource, LoadTime};
use maud::{Markup, html};

/// Element id of the panel header.
pub const EXPLORER_ID: &str = "explorer";

/// The browser script.
pub const SCRIPT: &str = include_str!("../static/explorer.js");

/// The script as a page resource: inline, after DOM ready.
pub fn script_resource() -> JsResource {
    JsResource {
        load_time: LoadTime::AfterDomReady,
        module_type: None,
        content: JsContent::Inline {
            script: SCRIPT.to_string(),
        },
    }
}

/// Panel markup: the clickable header followed by the collapsible content.
pub fn render_explorer(title: &str, content: Markup) -> Markup {
    html! {
        div.explorer {
            button.explorer-toggle id=(EXPLORER_ID) type="button" {
                h3 { (title) }
            }
            div.explorer-content {
                (content)
            }
        }
    }
}
