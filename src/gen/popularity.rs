//! Component-popularity report generation.
//!
//! The report is the bridge between the propagation pass and the learning
//! order generators: entries carry the normalized character, its counts,
//! coverage statuses, and (when known) its grapheme identity.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::core::popularity::PopularityMap;
use crate::core::{
    Codepoint, GraphemeId, KanjiId, KanjiUniverse, Normalizer, SourceStatus, SourceTag,
};
use crate::store::StoreError;
use crate::Result;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(rename = "char")]
    pub chr: String,
    pub original: String,
    pub stroke_count: u32,
    pub popularity: u32,
    pub is_grapheme: bool,
    pub primary_status: SourceStatus,
    pub fallback_status: SourceStatus,
    pub decomp_source: SourceTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grapheme_id: Option<GraphemeId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated: String,
    pub total_kanji: usize,
    pub in_primary: usize,
    pub in_fallback: usize,
    pub from_primary: usize,
    pub from_primary_atomic: usize,
    pub from_fallback: usize,
    pub from_fallback_atomic: usize,
    pub graphemes: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopularityReport {
    pub metadata: ReportMetadata,
    /// Stroke count (as string key) -> entries, popularity descending.
    pub by_stroke_count: BTreeMap<String, Vec<ReportEntry>>,
    pub entries: Vec<ReportEntry>,
}

pub fn build_popularity_report(
    universe: &KanjiUniverse,
    counts: &PopularityMap,
    generated: OffsetDateTime,
) -> PopularityReport {
    let mut entries: Vec<ReportEntry> = Vec::new();
    for (normalized, entry) in universe.iter() {
        entries.push(ReportEntry {
            chr: normalized.clone(),
            original: entry.original.clone(),
            stroke_count: entry.stroke_count,
            popularity: counts.get(normalized).copied().unwrap_or(0),
            is_grapheme: entry.grapheme_id.is_some(),
            primary_status: entry.primary_status,
            fallback_status: entry.fallback_status,
            decomp_source: entry.resolution,
            grapheme_id: entry.grapheme_id.clone(),
        });
    }

    let mut by_stroke_count: BTreeMap<String, Vec<ReportEntry>> = BTreeMap::new();
    for entry in &entries {
        by_stroke_count
            .entry(entry.stroke_count.to_string())
            .or_default()
            .push(entry.clone());
    }
    for group in by_stroke_count.values_mut() {
        group.sort_by(|a, b| b.popularity.cmp(&a.popularity).then(a.chr.cmp(&b.chr)));
    }

    let count_tag =
        |tag: SourceTag| entries.iter().filter(|e| e.decomp_source == tag).count();
    let metadata = ReportMetadata {
        generated: generated
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::new()),
        total_kanji: entries.len(),
        in_primary: entries
            .iter()
            .filter(|e| e.primary_status != SourceStatus::Missing)
            .count(),
        in_fallback: entries
            .iter()
            .filter(|e| e.fallback_status != SourceStatus::Missing)
            .count(),
        from_primary: count_tag(SourceTag::Primary),
        from_primary_atomic: count_tag(SourceTag::PrimaryAtomic),
        from_fallback: count_tag(SourceTag::Fallback),
        from_fallback_atomic: count_tag(SourceTag::FallbackAtomic),
        graphemes: entries.iter().filter(|e| e.is_grapheme).count(),
    };

    PopularityReport {
        metadata,
        by_stroke_count,
        entries,
    }
}

/// Write the report. Reports carry a generation timestamp, so unlike
/// documents they are rewritten unconditionally.
pub fn write_popularity_report(report: &PopularityReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let mut rendered = serde_json::to_string_pretty(report).map_err(StoreError::Encode)?;
    rendered.push('\n');
    fs::write(path, rendered).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), entries = report.entries.len(), "popularity report written");
    Ok(())
}

pub fn load_popularity_report(path: &Path) -> Result<PopularityReport> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let report = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(report)
}

/// Grapheme id -> popularity, from report entries flagged as graphemes.
pub fn grapheme_popularity(report: &PopularityReport) -> BTreeMap<GraphemeId, u32> {
    let mut popularity = BTreeMap::new();
    for entry in &report.entries {
        if let (true, Some(gid)) = (entry.is_grapheme, &entry.grapheme_id) {
            popularity.insert(gid.clone(), entry.popularity);
        }
    }
    popularity
}

/// Kanji id -> popularity, covering every entry (not only graphemes); the
/// higher count wins when normalization collapses entries together.
pub fn kanji_popularity(report: &PopularityReport) -> BTreeMap<KanjiId, u32> {
    let normalizer = Normalizer::plain();
    let mut popularity: BTreeMap<KanjiId, u32> = BTreeMap::new();
    for entry in &report.entries {
        let normalized = normalizer.normalize(&entry.chr);
        let Some(codepoint) = Codepoint::of(&normalized) else {
            continue;
        };
        let id = KanjiId::from_codepoint(codepoint);
        let slot = popularity.entry(id).or_insert(0);
        *slot = (*slot).max(entry.popularity);
    }
    popularity
}
