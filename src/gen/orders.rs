//! Learning-order document generation for both tracks.
//!
//! The grapheme order must exist before the kanji order: kanji readiness is
//! computed from positions in the default grapheme track.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::core::{
    Codepoint, Grade, GraphemeId, GraphemeSet, KanjiId, Normalizer, OrderViolation,
    grapheme_order, grapheme_readiness, kanji_order, validate_order, variant_group_map,
};
use crate::sources::dict::Dictionary;
use crate::store::{
    ComponentDepDoc, DocumentStore, KanjiDoc, LearningOrderDoc, OrderData, PrerequisiteDepDoc,
    VariantGroupDoc, WriteOutcome,
};
use crate::Result;

pub const GRAPHEME_ORDER_DOC_ID: &str = "japanese-grapheme-learning-order-default";
pub const KANJI_ORDER_DOC_ID: &str = "japanese-kanji-learning-order-default";

#[derive(Debug)]
pub struct OrderGenSummary {
    pub ordered: usize,
    pub violations: Vec<OrderViolation>,
    /// `None` on a dry run.
    pub outcome: Option<WriteOutcome>,
}

fn parse_grapheme_id(raw: &str) -> Option<GraphemeId> {
    match GraphemeId::parse(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(%raw, %err, "unparseable grapheme id skipped");
            None
        }
    }
}

fn parse_kanji_id(raw: &str) -> Option<KanjiId> {
    match KanjiId::parse(raw) {
        Ok(id) => Some(id),
        Err(err) => {
            warn!(%raw, %err, "unparseable kanji id skipped");
            None
        }
    }
}

/// Generate the default grapheme learning order.
pub fn generate_grapheme_order(
    graphemes: &GraphemeSet,
    group_docs: &[VariantGroupDoc],
    popularity: &BTreeMap<GraphemeId, u32>,
    dep_docs: &[ComponentDepDoc],
    store: &DocumentStore,
    dry_run: bool,
) -> Result<OrderGenSummary> {
    let raw_groups: BTreeMap<String, Vec<GraphemeId>> = group_docs
        .iter()
        .map(|doc| {
            let members: Vec<GraphemeId> = doc
                .member_ids()
                .iter()
                .filter_map(|raw| parse_grapheme_id(raw))
                .collect();
            (doc.id.clone(), members)
        })
        .collect();
    let (groups, anomalies) = variant_group_map(&raw_groups, graphemes);
    for anomaly in &anomalies {
        warn!(
            group = %anomaly.group_id,
            candidates = anomaly.base_candidates.len(),
            "variant group needs curation"
        );
    }

    let ordered = grapheme_order(graphemes, popularity, &groups);

    let deps: BTreeMap<GraphemeId, Vec<GraphemeId>> = dep_docs
        .iter()
        .filter_map(|doc| {
            let parent = parse_grapheme_id(doc.parent_id())?;
            let components = doc
                .component_ids()
                .iter()
                .filter_map(|raw| parse_grapheme_id(raw))
                .collect();
            Some((parent, components))
        })
        .collect();
    let symbols: BTreeMap<GraphemeId, String> = graphemes
        .iter()
        .map(|(id, g)| (id.clone(), g.symbol.clone()))
        .collect();
    let violations = validate_order(&ordered, &deps, &symbols);
    for violation in &violations {
        warn!(%violation, "grapheme order dependency violation");
    }

    let item_ids: Vec<String> = ordered.iter().map(|id| id.as_str().to_string()).collect();
    let doc = LearningOrderDoc::new(
        GRAPHEME_ORDER_DOC_ID.to_string(),
        OrderData {
            content_type: "grapheme".to_string(),
            track_id: "default".to_string(),
            track_name: "Default Grapheme Order".to_string(),
            source: Some(
                "Generated: stroke count ASC, popularity DESC, $id ASC. \
                 Variant groups kept together (base first)."
                    .to_string(),
            ),
        },
        &item_ids,
    );

    let outcome = if dry_run {
        None
    } else {
        Some(store.write(&format!("{GRAPHEME_ORDER_DOC_ID}.json"), &doc)?)
    };
    info!(
        ordered = ordered.len(),
        violations = violations.len(),
        dry_run,
        "grapheme learning order generated"
    );

    Ok(OrderGenSummary {
        ordered: ordered.len(),
        violations,
        outcome,
    })
}

/// Load the default grapheme order back and return item positions.
///
/// Read-back validation is strict: the writer guarantees these invariants,
/// so a violation means the document was corrupted.
pub fn load_default_order_positions(
    store: &DocumentStore,
    doc_id: &str,
) -> Result<BTreeMap<String, u32>> {
    let docs: Vec<LearningOrderDoc> = store.load_all()?;
    for doc in docs {
        if doc.id == doc_id {
            doc.validate(true)?;
            return Ok(doc.positions());
        }
    }
    warn!(%doc_id, "learning order document not found");
    Ok(BTreeMap::new())
}

/// Kanji id -> grade tier from the dictionary; first graded entry per
/// normalized form wins.
pub fn grade_map(dict: &Dictionary) -> BTreeMap<KanjiId, Grade> {
    let normalizer = Normalizer::plain();
    let mut grades: BTreeMap<KanjiId, Grade> = BTreeMap::new();
    for entry in dict.entries() {
        let Some(grade) = entry.grade else { continue };
        let normalized = normalizer.normalize(&entry.literal);
        let Some(codepoint) = Codepoint::of(&normalized) else {
            continue;
        };
        let id = KanjiId::from_codepoint(codepoint);
        grades.entry(id).or_insert(grade);
    }
    grades
}

/// Generate the default kanji learning order.
#[allow(clippy::too_many_arguments)]
pub fn generate_kanji_order(
    kanji_docs: &[KanjiDoc],
    kanji_dep_docs: &[PrerequisiteDepDoc],
    kanji_grapheme_dep_docs: &[ComponentDepDoc],
    grapheme_positions: &BTreeMap<String, u32>,
    grades: &BTreeMap<KanjiId, Grade>,
    popularity: &BTreeMap<KanjiId, u32>,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<OrderGenSummary> {
    let stroke_counts: BTreeMap<KanjiId, Option<u32>> = kanji_docs
        .iter()
        .filter_map(|doc| Some((parse_kanji_id(&doc.id)?, doc.stroke_count)))
        .collect();

    let grapheme_deps: BTreeMap<KanjiId, Vec<GraphemeId>> = kanji_grapheme_dep_docs
        .iter()
        .filter_map(|doc| {
            let parent = parse_kanji_id(doc.parent_id())?;
            let components = doc
                .component_ids()
                .iter()
                .filter_map(|raw| parse_grapheme_id(raw))
                .collect();
            Some((parent, components))
        })
        .collect();
    let positions_by_id: BTreeMap<GraphemeId, usize> = grapheme_positions
        .iter()
        .filter_map(|(raw, &pos)| Some((parse_grapheme_id(raw)?, pos as usize)))
        .collect();
    let readiness = grapheme_readiness(&grapheme_deps, &positions_by_id);

    let ordered = kanji_order(&stroke_counts, &readiness, grades, popularity);

    let deps: BTreeMap<KanjiId, Vec<KanjiId>> = kanji_dep_docs
        .iter()
        .filter_map(|doc| {
            let parent = parse_kanji_id(doc.parent_id())?;
            let prerequisites = doc
                .prerequisite_ids()
                .iter()
                .filter_map(|raw| parse_kanji_id(raw))
                .collect();
            Some((parent, prerequisites))
        })
        .collect();
    let symbols: BTreeMap<KanjiId, String> = kanji_docs
        .iter()
        .filter_map(|doc| Some((parse_kanji_id(&doc.id)?, doc.symbol.clone())))
        .collect();
    let violations = validate_order(&ordered, &deps, &symbols);
    for violation in &violations {
        warn!(%violation, "kanji order dependency violation");
    }

    let item_ids: Vec<String> = ordered.iter().map(|id| id.as_str().to_string()).collect();
    let doc = LearningOrderDoc::new(
        KANJI_ORDER_DOC_ID.to_string(),
        OrderData {
            content_type: "kanji".to_string(),
            track_id: "default".to_string(),
            track_name: "Default Kanji Order".to_string(),
            source: Some(
                "Generated: stroke count ASC, grapheme readiness ASC, \
                 kanjidic grade ASC, popularity DESC, $id ASC."
                    .to_string(),
            ),
        },
        &item_ids,
    );

    let outcome = if dry_run {
        None
    } else {
        Some(store.write(&format!("{KANJI_ORDER_DOC_ID}.json"), &doc)?)
    };
    info!(
        ordered = ordered.len(),
        violations = violations.len(),
        dry_run,
        "kanji learning order generated"
    );

    Ok(OrderGenSummary {
        ordered: ordered.len(),
        violations,
        outcome,
    })
}
