//! Kanji document generation from dictionary records.
//!
//! Only graded entries with at least one English meaning become documents.
//! The literal is normalized before the codepoint id is derived, so
//! compatibility ideographs land on their base form; entries that collapse
//! onto an already-seen normalized form are skipped (the dictionary lists
//! base forms first).

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::core::{Codepoint, KanjiId, Normalizer};
use crate::sources::dict::Dictionary;
use crate::store::{DocumentStore, KanjiDoc, ReconcileReport};
use crate::Result;

#[derive(Debug)]
pub struct KanjiGenSummary {
    pub documents: usize,
    pub skipped_no_meanings: usize,
    pub skipped_duplicates: usize,
    pub report: ReconcileReport,
}

pub fn generate_kanji_docs(
    dict: &Dictionary,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<KanjiGenSummary> {
    let normalizer = Normalizer::plain();
    let mut desired: BTreeMap<String, KanjiDoc> = BTreeMap::new();
    let mut skipped_no_meanings = 0usize;
    let mut skipped_duplicates = 0usize;

    for entry in dict.entries() {
        if entry.grade.is_none() {
            continue;
        }
        if entry.meanings.is_empty() {
            skipped_no_meanings += 1;
            continue;
        }

        let normalized = normalizer.normalize(&entry.literal);
        let Some(codepoint) = Codepoint::of(&normalized) else {
            warn!(literal = %entry.literal, %normalized, "normalized form is not a single character");
            continue;
        };
        let id = KanjiId::from_codepoint(codepoint);
        let filename = format!("{id}.json");

        if desired.contains_key(&filename) {
            skipped_duplicates += 1;
            continue;
        }

        desired.insert(
            filename,
            KanjiDoc {
                id: id.as_str().to_string(),
                unicode: codepoint.to_string(),
                symbol: normalized,
                meanings: entry.meanings.clone(),
                onyomi: entry.onyomi.clone(),
                kunyomi: entry.kunyomi.clone(),
                stroke_count: entry.stroke_count,
                jlpt_level: "unspecified".to_string(),
            },
        );
    }

    let documents = desired.len();
    let report = store.reconcile(&desired, dry_run)?;
    info!(
        documents,
        created = report.created.len(),
        updated = report.updated.len(),
        deleted = report.deleted.len(),
        dry_run,
        "kanji documents reconciled"
    );

    Ok(KanjiGenSummary {
        documents,
        skipped_no_meanings,
        skipped_duplicates,
        report,
    })
}
