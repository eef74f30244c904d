//! Dictionary source: one pre-parsed record per graded character.
//!
//! The raw dictionary is XML; parsing it is not this crate's job. We consume
//! a JSON array of records exposing literal, stroke counts, optional grade
//! tier, English meanings, and reading lists.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::core::Grade;
use super::SourceError;

/// One dictionary record, with multi-valued fields already collapsed:
/// only the first stroke count is kept (the primary count).
#[derive(Clone, Debug)]
pub struct DictEntry {
    pub literal: String,
    pub stroke_count: Option<u32>,
    pub grade: Option<Grade>,
    pub meanings: Vec<String>,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDictEntry {
    literal: String,
    #[serde(default)]
    stroke_counts: Vec<u32>,
    #[serde(default)]
    grade: Option<u8>,
    #[serde(default)]
    meanings: Vec<String>,
    #[serde(default)]
    onyomi: Vec<String>,
    #[serde(default)]
    kunyomi: Vec<String>,
}

impl From<RawDictEntry> for DictEntry {
    fn from(raw: RawDictEntry) -> Self {
        let grade = raw.grade.and_then(|n| match Grade::new(n) {
            Ok(grade) => Some(grade),
            Err(err) => {
                warn!(literal = %raw.literal, %err, "dictionary grade ignored");
                None
            }
        });
        Self {
            literal: raw.literal,
            stroke_count: raw.stroke_counts.first().copied(),
            grade,
            meanings: raw.meanings,
            onyomi: raw.onyomi,
            kunyomi: raw.kunyomi,
        }
    }
}

/// The loaded dictionary, in file order.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    entries: Vec<DictEntry>,
}

impl Dictionary {
    pub fn new(entries: Vec<DictEntry>) -> Self {
        Self { entries }
    }

    /// Load dictionary records from a JSON array file.
    ///
    /// Unlike the decomposition sources there is no second dictionary to
    /// fall back on, so an unreadable file is an error.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let contents = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let raw: Vec<RawDictEntry> =
            serde_json::from_str(&contents).map_err(|source| SourceError::Json {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            entries: raw.into_iter().map(DictEntry::from).collect(),
        })
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// Entries with a grade tier and at least one English meaning - the set
    /// that becomes kanji documents.
    pub fn graded_with_meanings(&self) -> impl Iterator<Item = &DictEntry> {
        self.entries
            .iter()
            .filter(|e| e.grade.is_some() && !e.meanings.is_empty())
    }

    /// Literal -> stroke count for every entry that has one, first entry
    /// winning on literal repeats.
    pub fn stroke_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            if let Some(strokes) = entry.stroke_count {
                counts.entry(entry.literal.clone()).or_insert(strokes);
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
