//! Font loading for social image rendering.
//!
//! Loading a font database scans every system font directory, which is far
//! too slow to repeat per page. A [`FontHandle`] defers the load until the
//! first image is actually rendered and then shares the result with every
//! job of the run, across threads. Runs that generate no images never touch
//! the font directories.

use resvg::usvg::fontdb::Database;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Generic family named when the database has no faces at all.
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// A loaded font database plus the families layouts should use.
#[derive(Clone)]
pub struct FontSet {
    pub db: Arc<Database>,
    pub header_family: String,
    pub body_family: String,
}

impl FontSet {
    /// Whether the database has a face for the given family name.
    pub fn has_family(&self, family: &str) -> bool {
        has_family(&self.db, family)
    }
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("faces", &self.db.len())
            .field("header_family", &self.header_family)
            .field("body_family", &self.body_family)
            .finish()
    }
}

/// A family the database actually contains, preferring sans-serif faces.
///
/// fontdb maps the generic `sans-serif` to a fixed name ("Arial") rather
/// than asking fontconfig, so falling back to the generic name draws nothing
/// on hosts without that font.
pub fn installed_fallback(db: &Database) -> Option<String> {
    let families = || {
        db.faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
    };
    families()
        .find(|name| name.contains("Sans") && !name.contains("Mono"))
        .or_else(|| families().next())
        .map(String::from)
}

fn has_family(db: &Database, family: &str) -> bool {
    db.faces().any(|face| {
        face.families
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case(family))
    })
}

/// Produces the font set for a header/body family pair.
///
/// Must not fail: a missing family degrades to an installed one.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, header: &str, body: &str) -> FontSet;
}

/// Loads installed system fonts plus any extra font directories.
#[derive(Debug, Clone, Default)]
pub struct SystemFontResolver {
    dirs: Vec<PathBuf>,
}

impl SystemFontResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl FontResolver for SystemFontResolver {
    fn resolve(&self, header: &str, body: &str) -> FontSet {
        let mut db = Database::new();
        db.load_system_fonts();
        for dir in &self.dirs {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "loaded font database");

        let fallback = installed_fallback(&db);
        if let Some(name) = &fallback {
            db.set_sans_serif_family(name.clone());
        }
        let fallback = fallback.unwrap_or_else(|| FALLBACK_FAMILY.to_string());

        let pick = |family: &str| {
            if has_family(&db, family) {
                family.to_string()
            } else {
                tracing::warn!(family, fallback = %fallback, "font family not found");
                fallback.clone()
            }
        };
        let header_family = pick(header);
        let body_family = pick(body);

        FontSet {
            db: Arc::new(db),
            header_family,
            body_family,
        }
    }
}

/// Lazily resolved font set, shared by every image job of a run.
///
/// The resolver runs at most once, on the first call to [`get`](Self::get),
/// no matter how many threads ask concurrently.
pub struct FontHandle {
    resolver: Arc<dyn FontResolver>,
    header: String,
    body: String,
    cell: OnceLock<Arc<FontSet>>,
}

impl FontHandle {
    pub fn new(resolver: Arc<dyn FontResolver>, header: &str, body: &str) -> Self {
        Self {
            resolver,
            header: header.to_string(),
            body: body.to_string(),
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Arc<FontSet> {
        self.cell
            .get_or_init(|| Arc::new(self.resolver.resolve(&self.header, &self.body)))
            .clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn families(&self) -> (&str, &str) {
        (&self.header, &self.body)
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("header", &self.header)
            .field("body", &self.body)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
