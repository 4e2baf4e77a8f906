//! Page and resource types handed over by the upstream site build.
//!
//! These are deserialized from the page manifest (JSON) and passed unchanged
//! to the head renderer. Frontmatter keys keep the camelCase spelling used in
//! source documents; everything else is snake_case.

use serde::{Deserialize, Serialize};

/// Metadata for one output page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Source path relative to the content root, without extension
    /// (e.g. `"notes/rust"`). Absent for generated pages such as tag listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Output URL path (e.g. `"notes/rust"`, `"index"`, `"404"`).
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
    /// Description computed upstream from the page body. May contain HTML entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The frontmatter fields the head cares about. Other keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Overrides any page description, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_image_url: Option<String>,
}

impl Frontmatter {
    /// Social image fields in preference order, paired with their frontmatter key.
    ///
    /// `image` and `cover` exist for compatibility with other publishing tools;
    /// `socialImageUrl` is the legacy spelling.
    pub fn image_aliases(&self) -> [(&'static str, Option<&str>); 4] {
        [
            ("socialImage", self.social_image.as_deref()),
            ("image", self.image.as_deref()),
            ("cover", self.cover.as_deref()),
            ("socialImageUrl", self.social_image_url.as_deref()),
        ]
    }
}

/// Bundled CSS and JS for a page, already resolved to URLs or inline content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalResources {
    /// Stylesheet URLs. Order is render order.
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub js: Vec<JsResource>,
}

/// When a script should run relative to page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadTime {
    /// Emitted in `<head>`.
    #[serde(rename = "beforeDOMReady")]
    BeforeDomReady,
    /// Emitted at the end of `<body>` by the page template.
    #[serde(rename = "afterDOMReady")]
    AfterDomReady,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsResource {
    pub load_time: LoadTime,
    /// `type` attribute; `application/javascript` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(flatten)]
    pub content: JsContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "snake_case")]
pub enum JsContent {
    External { src: String },
    Inline { script: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_page_without_file_path() {
        let page: PageData = serde_json::from_str(r#"{"slug": "tags/rust"}"#).unwrap();
        assert_eq!(page.slug, "tags/rust");
        assert_eq!(page.file_path, None);
        assert_eq!(page.frontmatter, None);
    }

    #[test]
    fn parse_frontmatter_camel_case_keys() {
        let json = r#"{
            "file_path": "notes/a",
            "slug": "notes/a",
            "frontmatter": {
                "title": "Hello",
                "socialDescription": "Shared text",
                "socialImageUrl": "legacy.png",
                "tags": ["ignored"]
            }
        }"#;
        let page: PageData = serde_json::from_str(json).unwrap();
        let fm = page.frontmatter.unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.social_description.as_deref(), Some("Shared text"));
        assert_eq!(fm.social_image_url.as_deref(), Some("legacy.png"));
    }

    #[test]
    fn image_aliases_preference_order() {
        let fm = Frontmatter {
            cover: Some("c.png".into()),
            image: Some("i.png".into()),
            ..Default::default()
        };
        let keys: Vec<&str> = fm.image_aliases().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["socialImage", "image", "cover", "socialImageUrl"]);
        let first = fm.image_aliases().into_iter().find_map(|(_, v)| v);
        assert_eq!(first, Some("i.png"));
    }

    #[test]
    fn parse_js_resources() {
        let json = r#"{
            "css": ["index.css", "custom.css"],
            "js": [
                {"load_time": "beforeDOMReady", "content_type": "inline", "script": "let a = 1"},
                {"load_time": "afterDOMReady", "content_type": "external", "src": "/postscript.js", "module_type": "module"}
            ]
        }"#;
        let resources: ExternalResources = serde_json::from_str(json).unwrap();
        assert_eq!(resources.css, vec!["index.css", "custom.css"]);
        assert_eq!(resources.js[0].load_time, LoadTime::BeforeDomReady);
        assert_eq!(
            resources.js[0].content,
            JsContent::Inline {
                script: "let a = 1".into()
            }
        );
        assert_eq!(resources.js[1].module_type.as_deref(), Some("module"));
        assert_eq!(
            resources.js[1].content,
            JsContent::External {
                src: "/postscript.js".into()
            }
        );
    }

    #[test]
    fn missing_resources_default_to_empty() {
        let resources: ExternalResources = serde_json::from_str("{}").unwrap();
        assert!(resources.css.is_empty());
        assert!(resources.js.is_empty());
    }
}
