//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the site root overrides only the
//! keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # base_url = "example.com/garden"   # Host + path, no scheme. Omit to skip URL tags.
//! page_title = "Untitled Site"
//!
//! # Either a switch ...
//! social_images = false
//! # ... or a table, which also switches generation on:
//! # [social_images]
//! # color_scheme = "light_mode"       # light_mode | dark_mode
//! # width = 1200
//! # height = 676
//!
//! [typography]
//! header = "Schibsted Grotesk"
//! body = "Source Sans Pro"
//!
//! [fonts]
//! dirs = []                           # Extra font directories for social images
//!
//! [colors.light_mode]
//! light = "#faf8f8"
//! lightgray = "#e5e5e5"
//! gray = "#b8b8b8"
//! darkgray = "#4e4e4e"
//! dark = "#2b2b2b"
//! secondary = "#284b63"
//! tertiary = "#84a59d"
//! highlight = "rgba(143, 159, 169, 0.15)"
//!
//! [colors.dark_mode]
//! # same keys as light_mode
//!
//! [processing]
//! max_processes = 4                   # Max parallel image workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Read-only for the duration of a build. User config files need only specify
/// the values they want to override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Host and optional path prefix, without scheme (e.g. `"example.com/garden"`).
    /// When absent, every URL-dependent head tag is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Site name, used for `og:site_name` and the social image footer.
    pub page_title: String,
    /// Social preview image generation: a switch or an options table.
    pub social_images: SocialImagesSetting,
    /// Header and body font families.
    pub typography: TypographyConfig,
    /// Where to look for font files besides the system font directories.
    pub fonts: FontsConfig,
    /// Color palettes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            page_title: "Untitled Site".to_string(),
            social_images: SocialImagesSetting::default(),
            typography: TypographyConfig::default(),
            fonts: FontsConfig::default(),
            colors: ColorConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            if base_url.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "base_url must not be empty (omit it instead)".into(),
                ));
            }
            if base_url.contains("://") {
                return Err(ConfigError::Validation(
                    "base_url must not include a scheme (use \"example.com\", not \"https://example.com\")"
                        .into(),
                ));
            }
        }
        if let SocialImagesSetting::Options(opts) = &self.social_images {
            if opts.width == Some(0) || opts.height == Some(0) {
                return Err(ConfigError::Validation(
                    "social_images.width and social_images.height must be non-zero".into(),
                ));
            }
        }
        if self.typography.header.trim().is_empty() || self.typography.body.trim().is_empty() {
            return Err(ConfigError::Validation(
                "typography.header and typography.body must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// `social_images = true` or `[social_images] width = 1000`.
///
/// A table always means "enabled", the same way any options record counts as
/// switched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocialImagesSetting {
    Toggle(bool),
    Options(SocialImageOverrides),
}

impl SocialImagesSetting {
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Toggle(enabled) => *enabled,
            Self::Options(_) => true,
        }
    }
}

impl Default for SocialImagesSetting {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

/// User-supplied social image fields. Anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialImageOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorSchemeChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Which palette the social image layout draws with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSchemeChoice {
    #[default]
    LightMode,
    DarkMode,
}

/// Font families for headings and body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypographyConfig {
    pub header: String,
    pub body: String,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            header: "Schibsted Grotesk".to_string(),
            body: "Source Sans Pro".to_string(),
        }
    }
}

/// Extra font sources for social image rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Directories scanned (recursively) for `.ttf`/`.otf`/`.ttc` files.
    pub dirs: Vec<String>,
}

impl FontsConfig {
    /// Font directories taken relative to `base` (absolute entries stay as-is).
    pub fn resolve_dirs(&self, base: &Path) -> Vec<PathBuf> {
        self.dirs.iter().map(|dir| base.join(dir)).collect()
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel social image workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color palettes for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light_mode: ColorScheme,
    pub dark_mode: ColorScheme,
}

impl ColorConfig {
    pub fn scheme(&self, choice: ColorSchemeChoice) -> &ColorScheme {
        match choice {
            ColorSchemeChoice::LightMode => &self.light_mode,
            ColorSchemeChoice::DarkMode => &self.dark_mode,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light_mode: ColorScheme::default_light(),
            dark_mode: ColorScheme::default_dark(),
        }
    }
}

/// Individual palette. `light` is the page background, `dark` the main text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub light: String,
    pub lightgray: String,
    pub gray: String,
    pub darkgray: String,
    pub dark: String,
    pub secondary: String,
    pub tertiary: String,
    pub highlight: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            light: "#faf8f8".to_string(),
            lightgray: "#e5e5e5".to_string(),
            gray: "#b8b8b8".to_string(),
            darkgray: "#4e4e4e".to_string(),
            dark: "#2b2b2b".to_string(),
            secondary: "#284b63".to_string(),
            tertiary: "#84a59d".to_string(),
            highlight: "rgba(143, 159, 169, 0.15)".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            light: "#161618".to_string(),
            lightgray: "#393639".to_string(),
            gray: "#646464".to_string(),
            darkgray: "#d4d4d4".to_string(),
            dark: "#ebebec".to_string(),
            secondary: "#7b97aa".to_string(),
            tertiary: "#84a59d".to_string(),
            highlight: "rgba(143, 159, 169, 0.15)".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so
///   `social_images = false` in the stock layer is replaced wholesale by a
///   user `[social_images]` table.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pagehead configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Host and optional path prefix, without scheme. When omitted, og:image,
# og:url, twitter:* URL tags and the canonical URL are left out of every page.
# base_url = "example.com"

# Site name used for og:site_name and the social image footer.
page_title = "Untitled Site"

# Social preview images, written as WebP to static/social-images/.
# Either a switch:
social_images = false
# or a table (which also enables generation):
# [social_images]
# color_scheme = "light_mode"   # light_mode | dark_mode
# width = 1200
# height = 676

# ---------------------------------------------------------------------------
# Typography
# ---------------------------------------------------------------------------
[typography]
header = "Schibsted Grotesk"
body = "Source Sans Pro"

# ---------------------------------------------------------------------------
# Fonts for social image rendering
# ---------------------------------------------------------------------------
[fonts]
# Directories scanned for font files in addition to the system fonts.
dirs = []

# ---------------------------------------------------------------------------
# Colors - light mode
# ---------------------------------------------------------------------------
[colors.light_mode]
light = "#faf8f8"
lightgray = "#e5e5e5"
gray = "#b8b8b8"
darkgray = "#4e4e4e"
dark = "#2b2b2b"
secondary = "#284b63"
tertiary = "#84a59d"
highlight = "rgba(143, 159, 169, 0.15)"

# ---------------------------------------------------------------------------
# Colors - dark mode
# ---------------------------------------------------------------------------
[colors.dark_mode]
light = "#161618"
lightgray = "#393639"
gray = "#646464"
darkgray = "#d4d4d4"
dark = "#ebebec"
secondary = "#7b97aa"
tertiary = "#84a59d"
highlight = "rgba(143, 159, 169, 0.15)"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel social image workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn font_dirs_resolve_against_base() {
        let fonts = FontsConfig {
            dirs: vec!["fonts".into(), "/usr/share/fonts/custom".into()],
        };
        assert_eq!(
            fonts.resolve_dirs(Path::new("site")),
            vec![
                PathBuf::from("site/fonts"),
                PathBuf::from("/usr/share/fonts/custom")
            ]
        );
    }

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.base_url, None);
        assert_eq!(config.page_title, "Untitled Site");
        assert!(!config.social_images.is_enabled());
        assert_eq!(config.typography.header, "Schibsted Grotesk");
        assert_eq!(config.colors.light_mode.light, "#faf8f8");
        assert_eq!(config.colors.dark_mode.light, "#161618");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
base_url = "example.com"

[colors.light_mode]
light = "#ffffff"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("example.com"));
        assert_eq!(config.colors.light_mode.light, "#ffffff");
        // Untouched values keep their defaults
        assert_eq!(config.colors.light_mode.dark, "#2b2b2b");
        assert_eq!(config.page_title, "Untitled Site");
    }

    #[test]
    fn social_images_as_bool() {
        let config: SiteConfig = toml::from_str("social_images = true").unwrap();
        assert_eq!(config.social_images, SocialImagesSetting::Toggle(true));
        assert!(config.social_images.is_enabled());
    }

    #[test]
    fn social_images_as_table_is_enabled() {
        let toml = r#"
[social_images]
width = 1000
color_scheme = "dark_mode"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert!(config.social_images.is_enabled());
        assert_eq!(
            config.social_images,
            SocialImagesSetting::Options(SocialImageOverrides {
                color_scheme: Some(ColorSchemeChoice::DarkMode),
                width: Some(1000),
                height: None,
            })
        );
    }

    #[test]
    fn empty_social_images_table_is_enabled() {
        let config: SiteConfig = toml::from_str("[social_images]").unwrap();
        assert!(config.social_images.is_enabled());
    }

    #[test]
    fn color_scheme_lookup() {
        let colors = ColorConfig::default();
        assert_eq!(colors.scheme(ColorSchemeChoice::LightMode).light, "#faf8f8");
        assert_eq!(colors.scheme(ColorSchemeChoice::DarkMode).light, "#161618");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.page_title, "Untitled Site");
        assert!(!config.social_images.is_enabled());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
page_title = "Digital Garden"
base_url = "garden.example.org"

[social_images]
height = 630
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.page_title, "Digital Garden");
        assert_eq!(config.base_url.as_deref(), Some("garden.example.org"));
        assert_eq!(
            config.social_images,
            SocialImagesSetting::Options(SocialImageOverrides {
                height: Some(630),
                ..Default::default()
            })
        );
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[typography]
header = "A"
body = "B"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[typography]
body = "C"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let typography = merged.get("typography").unwrap();
        assert_eq!(typography.get("header").unwrap().as_str(), Some("A"));
        assert_eq!(typography.get("body").unwrap().as_str(), Some("C"));
    }

    #[test]
    fn merge_toml_table_replaces_scalar() {
        let base: toml::Value = toml::from_str("social_images = false").unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[social_images]
width = 800
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let social = merged.get("social_images").unwrap();
        assert!(social.is_table());
        assert_eq!(social.get("width").unwrap().as_integer(), Some(800));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("page_titel = \"x\"");
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = r##"
[colors.light_mode]
bg = "#fff"
"##;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_social_image_key_rejected() {
        let toml_str = r#"
[social_images]
widht = 800
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_scheme_in_base_url() {
        let config = SiteConfig {
            base_url: Some("https://example.com".to_string()),
            ..SiteConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let config = SiteConfig {
            base_url: Some("  ".to_string()),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_dimensions() {
        let config = SiteConfig {
            social_images: SocialImagesSetting::Options(SocialImageOverrides {
                width: Some(0),
                ..Default::default()
            }),
            ..SiteConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"base_url = "http://example.com""#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn resolve_config_with_no_overlay() {
        let config = resolve_config(stock_defaults_value(), None).unwrap();
        assert_eq!(config.page_title, "Untitled Site");
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.page_title, defaults.page_title);
        assert_eq!(config.social_images, defaults.social_images);
        assert_eq!(config.typography.body, defaults.typography.body);
        assert_eq!(config.colors.dark_mode.dark, defaults.colors.dark_mode.dark);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("typography").is_some());
        assert!(val.get("colors").is_some());
        assert!(val.get("fonts").is_some());
        assert!(val.get("social_images").is_some());
        assert!(val.get("base_url").is_none());
    }
}
