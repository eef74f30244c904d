//! Fallback decomposition source: a pre-parsed stroke-diagram index.
//!
//! The upstream index is produced by a stroke-order database whose diagram
//! files are parsed elsewhere; this crate only consumes the "direct child
//! components, simplified forms, non-recursive" accessor. A record that
//! failed to parse upstream is treated as having no fallback decomposition.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::warn;

/// Opaque capability over the stroke-diagram index.
///
/// `contains` answers "does the source know this character at all", which
/// is distinct from `children` being empty: a known character with no
/// children is atomic in this source, an unknown one is absent.
pub trait StrokeSource {
    fn contains(&self, chr: &str) -> bool;

    /// Direct child components, simplified/canonical forms, non-recursive.
    /// Empty on parse failure (fail soft, never fatal).
    fn children(&self, chr: &str) -> BTreeSet<String>;
}

/// In-memory stroke index loaded from a JSON object file:
/// `{ "林": ["木", "木"], ... }`.
#[derive(Clone, Debug, Default)]
pub struct StrokeIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl StrokeIndex {
    pub fn new(entries: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self { entries }
    }

    /// Load the index from disk.
    ///
    /// An absent or unreadable file degrades to an empty index; a record
    /// with a malformed children list is skipped in isolation.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "stroke index unavailable");
                return Self::default();
            }
        };

        let parsed: Value = match serde_json::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(path = %path.display(), %err, "stroke index unparseable");
                return Self::default();
            }
        };

        let Value::Object(map) = parsed else {
            warn!(path = %path.display(), "stroke index root is not an object");
            return Self::default();
        };

        let mut entries = BTreeMap::new();
        for (chr, children) in map {
            match children_from_value(&children) {
                Some(children) => {
                    entries.insert(chr, children);
                }
                None => {
                    warn!(%chr, "malformed stroke record skipped");
                }
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn children_from_value(value: &Value) -> Option<BTreeSet<String>> {
    let Value::Array(items) = value else {
        return None;
    };
    let mut children = BTreeSet::new();
    for item in items {
        children.insert(item.as_str()?.to_string());
    }
    Some(children)
}

impl StrokeSource for StrokeIndex {
    fn contains(&self, chr: &str) -> bool {
        self.entries.contains_key(chr)
    }

    fn children(&self, chr: &str) -> BTreeSet<String> {
        self.entries.get(chr).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_deduplicate_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, r#"{"林": ["木", "木"], "一": []}"#).unwrap();

        let index = StrokeIndex::load(&path);
        assert_eq!(index.children("林").len(), 1);
        assert!(index.contains("一"));
        assert!(index.children("一").is_empty());
        assert!(!index.contains("鬱"));
    }

    #[test]
    fn malformed_record_is_skipped_in_isolation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, r#"{"林": ["木"], "鬱": 12, "森": ["木"]}"#).unwrap();

        let index = StrokeIndex::load(&path);
        assert!(index.contains("林"));
        assert!(index.contains("森"));
        assert!(!index.contains("鬱"));
    }

    #[test]
    fn missing_or_unparseable_file_degrades_to_empty() {
        assert!(StrokeIndex::load(Path::new("/nonexistent/strokes.json")).is_empty());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strokes.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(StrokeIndex::load(&path).is_empty());
    }
}
