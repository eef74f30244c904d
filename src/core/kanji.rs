//! The kanji universe: every dictionary character with a known stroke
//! count, keyed by its normalized form.
//!
//! Several raw dictionary entries can normalize to the same character
//! (compatibility ideograph plus base form); the entry with the lower
//! stroke count is kept as canonical.

use std::collections::BTreeMap;

use super::domain::{SourceStatus, SourceTag};
use super::grapheme::GraphemeSet;
use super::identity::GraphemeId;
use super::normalize::Normalizer;
use super::resolve::ComponentResolver;
use crate::sources::dict::Dictionary;
use crate::sources::strokes::StrokeSource;

/// One normalized character with its analysis data.
#[derive(Clone, Debug)]
pub struct UniverseEntry {
    /// Raw dictionary spelling (kept for source lookups, which cover the
    /// unnormalized form better).
    pub original: String,
    pub normalized: String,
    pub stroke_count: u32,
    /// Set when the normalized form is a grapheme, canonical or variant.
    pub grapheme_id: Option<GraphemeId>,
    pub primary_status: SourceStatus,
    pub fallback_status: SourceStatus,
    pub resolution: SourceTag,
}

#[derive(Clone, Debug, Default)]
pub struct KanjiUniverse {
    entries: BTreeMap<String, UniverseEntry>,
}

impl KanjiUniverse {
    /// Build the universe from dictionary entries that carry stroke counts.
    pub fn build<S: StrokeSource>(
        dict: &Dictionary,
        graphemes: &GraphemeSet,
        resolver: &mut ComponentResolver<'_, S>,
        normalizer: &Normalizer,
    ) -> Self {
        let mut entries: BTreeMap<String, UniverseEntry> = BTreeMap::new();

        for record in dict.entries() {
            let Some(stroke_count) = record.stroke_count else {
                continue;
            };
            let normalized = normalizer.normalize(&record.literal);

            match entries.get_mut(&normalized) {
                Some(existing) => {
                    // Collision: the lower stroke count represents the
                    // simpler form and becomes canonical.
                    if stroke_count < existing.stroke_count {
                        existing.original = record.literal.clone();
                        existing.stroke_count = stroke_count;
                    }
                }
                None => {
                    entries.insert(
                        normalized.clone(),
                        UniverseEntry {
                            original: record.literal.clone(),
                            normalized: normalized.clone(),
                            stroke_count,
                            grapheme_id: None,
                            primary_status: SourceStatus::Missing,
                            fallback_status: SourceStatus::Missing,
                            resolution: SourceTag::Absent,
                        },
                    );
                }
            }

            // Refresh the flags on every pass so they track the canonical
            // original spelling.
            let entry = entries.get_mut(&normalized).expect("just inserted");
            entry.grapheme_id = graphemes.lookup_symbol(&normalized).cloned();
            let (primary, fallback) = resolver.library_status(&entry.original, normalizer);
            entry.primary_status = primary;
            entry.fallback_status = fallback;
            let (_, tag) = resolver.components(&entry.original, normalizer);
            entry.resolution = tag;
        }

        Self { entries }
    }

    pub fn get(&self, normalized: &str) -> Option<&UniverseEntry> {
        self.entries.get(normalized)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UniverseEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
