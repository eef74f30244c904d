//! Dependency document generation.
//!
//! Three collections share one shape of work: decompose a parent with the
//! expanded union, map components onto a target id space, drop self-edges,
//! deduplicate, and reconcile the resulting documents.
//!
//! Decomposition always runs on the unnormalized spelling (the sources
//! cover it better); stored ids are always normalized.

use std::collections::BTreeMap;

use tracing::info;

use crate::core::{
    Codepoint, ComponentResolver, GraphemeSet, KanjiId, Normalizer,
};
use crate::sources::dict::Dictionary;
use crate::sources::strokes::StrokeSource;
use crate::store::{ComponentDepDoc, DocumentStore, PrerequisiteDepDoc, ReconcileReport};
use crate::Result;

#[derive(Debug)]
pub struct DepGenSummary {
    pub with_deps: usize,
    pub without_deps: usize,
    pub edges: usize,
    pub report: ReconcileReport,
}

/// Grapheme -> grapheme dependencies.
///
/// Components are discovered through the expanded union with variant
/// elaboration, additionally folding in the components of the grapheme's
/// own variant spellings, then filtered to components that are themselves
/// graphemes.
pub fn generate_grapheme_deps<S: StrokeSource>(
    graphemes: &GraphemeSet,
    resolver: &mut ComponentResolver<'_, S>,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<DepGenSummary> {
    let normalizer = Normalizer::with_variant_fold(graphemes.variant_to_symbol());
    let mut desired: BTreeMap<String, ComponentDepDoc> = BTreeMap::new();
    let mut without_deps = 0usize;
    let mut edges = 0usize;

    for (gid, grapheme) in graphemes.iter() {
        let mut discovered =
            resolver.expanded_components_with_variants(&grapheme.symbol, graphemes, &normalizer);
        for variant in &grapheme.variants {
            discovered.extend(resolver.expanded_components_with_variants(
                &variant.symbol,
                graphemes,
                &normalizer,
            ));
        }
        discovered.remove(&grapheme.symbol);

        let mut component_ids: Vec<String> = Vec::new();
        for component in &discovered {
            let normalized = normalizer.normalize(component);
            let Some(component_gid) = graphemes.lookup_symbol(&normalized) else {
                continue;
            };
            if component_gid == gid {
                continue;
            }
            let id = component_gid.as_str().to_string();
            if !component_ids.contains(&id) {
                component_ids.push(id);
            }
        }

        if component_ids.is_empty() {
            without_deps += 1;
            continue;
        }

        edges += component_ids.len();
        let dep_id = format!("grapheme-dep:{}", gid.unicode_part());
        let doc = ComponentDepDoc::new(dep_id.clone(), gid.as_str().to_string(), &component_ids);
        desired.insert(format!("{dep_id}.json"), doc);
    }

    let with_deps = desired.len();
    let report = store.reconcile(&desired, dry_run)?;
    info!(
        with_deps,
        without_deps,
        edges,
        deleted = report.deleted.len(),
        dry_run,
        "grapheme dependencies reconciled"
    );

    Ok(DepGenSummary {
        with_deps,
        without_deps,
        edges,
        report,
    })
}

/// Normalized symbol -> kanji id over graded dictionary entries with
/// meanings, skipping normalized duplicates. The iteration list pairs each
/// kanji id with the unnormalized literal used for decomposition.
fn kanji_id_space(
    dict: &Dictionary,
    normalizer: &Normalizer,
) -> (BTreeMap<String, KanjiId>, Vec<(KanjiId, String)>) {
    let mut symbol_to_id: BTreeMap<String, KanjiId> = BTreeMap::new();
    let mut iteration: Vec<(KanjiId, String)> = Vec::new();

    for entry in dict.graded_with_meanings() {
        let normalized = normalizer.normalize(&entry.literal);
        if symbol_to_id.contains_key(&normalized) {
            continue;
        }
        let Some(codepoint) = Codepoint::of(&normalized) else {
            continue;
        };
        let id = KanjiId::from_codepoint(codepoint);
        symbol_to_id.insert(normalized, id.clone());
        iteration.push((id, entry.literal.clone()));
    }

    (symbol_to_id, iteration)
}

/// Kanji -> kanji prerequisites: components that are themselves kanji in
/// the generated document set.
pub fn generate_kanji_deps<S: StrokeSource>(
    dict: &Dictionary,
    resolver: &mut ComponentResolver<'_, S>,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<DepGenSummary> {
    let normalizer = Normalizer::plain();
    let (symbol_to_id, iteration) = kanji_id_space(dict, &normalizer);

    let mut desired: BTreeMap<String, PrerequisiteDepDoc> = BTreeMap::new();
    let mut without_deps = 0usize;
    let mut edges = 0usize;

    for (kanji_id, literal) in &iteration {
        let components = resolver.expanded_components(literal, &normalizer);

        let mut prerequisite_ids: Vec<String> = Vec::new();
        for component in &components {
            let normalized = normalizer.normalize(component);
            let Some(component_id) = symbol_to_id.get(&normalized) else {
                continue;
            };
            if component_id == kanji_id {
                continue;
            }
            let id = component_id.as_str().to_string();
            if !prerequisite_ids.contains(&id) {
                prerequisite_ids.push(id);
            }
        }

        if prerequisite_ids.is_empty() {
            without_deps += 1;
            continue;
        }

        edges += prerequisite_ids.len();
        let dep_id = format!("kanji-dep:{}", kanji_id.unicode_part());
        let doc = PrerequisiteDepDoc::new(
            dep_id.clone(),
            kanji_id.as_str().to_string(),
            &prerequisite_ids,
        );
        desired.insert(format!("{dep_id}.json"), doc);
    }

    let with_deps = desired.len();
    let report = store.reconcile(&desired, dry_run)?;
    info!(
        with_deps,
        without_deps,
        edges,
        deleted = report.deleted.len(),
        dry_run,
        "kanji dependencies reconciled"
    );

    Ok(DepGenSummary {
        with_deps,
        without_deps,
        edges,
        report,
    })
}

/// Kanji -> grapheme components.
pub fn generate_kanji_grapheme_deps<S: StrokeSource>(
    dict: &Dictionary,
    graphemes: &GraphemeSet,
    resolver: &mut ComponentResolver<'_, S>,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<DepGenSummary> {
    let normalizer = Normalizer::plain();
    let (_, iteration) = kanji_id_space(dict, &normalizer);

    let mut desired: BTreeMap<String, ComponentDepDoc> = BTreeMap::new();
    let mut without_deps = 0usize;
    let mut edges = 0usize;

    for (kanji_id, literal) in &iteration {
        let components = resolver.expanded_components(literal, &normalizer);

        let mut grapheme_ids: Vec<String> = Vec::new();
        for component in &components {
            let normalized = normalizer.normalize(component);
            let Some(gid) = graphemes.lookup_symbol(&normalized) else {
                continue;
            };
            let id = gid.as_str().to_string();
            if !grapheme_ids.contains(&id) {
                grapheme_ids.push(id);
            }
        }

        if grapheme_ids.is_empty() {
            without_deps += 1;
            continue;
        }

        edges += grapheme_ids.len();
        let dep_id = format!("kanji-grapheme-dep:{}", kanji_id.unicode_part());
        let doc =
            ComponentDepDoc::new(dep_id.clone(), kanji_id.as_str().to_string(), &grapheme_ids);
        desired.insert(format!("{dep_id}.json"), doc);
    }

    let with_deps = desired.len();
    let report = store.reconcile(&desired, dry_run)?;
    info!(
        with_deps,
        without_deps,
        edges,
        deleted = report.deleted.len(),
        dry_run,
        "kanji-grapheme dependencies reconciled"
    );

    Ok(DepGenSummary {
        with_deps,
        without_deps,
        edges,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Grade;
    use crate::sources::dict::DictEntry;
    use crate::sources::ids::IdsTable;
    use crate::sources::strokes::StrokeIndex;

    fn entry(literal: &str, strokes: u32) -> DictEntry {
        DictEntry {
            literal: literal.to_string(),
            stroke_count: Some(strokes),
            grade: Some(Grade::new(1).unwrap()),
            meanings: vec!["meaning".to_string()],
            onyomi: Vec::new(),
            kunyomi: Vec::new(),
        }
    }

    fn ids_table(rows: &[(&str, &str)]) -> IdsTable {
        IdsTable::new(
            rows.iter()
                .map(|(c, ids)| (c.to_string(), ids.to_string()))
                .collect(),
        )
    }

    #[test]
    fn repeated_visual_component_is_recorded_once() {
        // 林 contains 木 twice; the dependency edge exists once.
        let dict = Dictionary::new(vec![entry("木", 4), entry("林", 8)]);
        let ids = ids_table(&[("木", "木"), ("林", "⿰木木")]);
        let strokes = StrokeIndex::default();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let summary = generate_kanji_deps(&dict, &mut resolver, &store, false).unwrap();
        assert_eq!(summary.with_deps, 1);
        assert_eq!(summary.edges, 1);

        let docs: Vec<PrerequisiteDepDoc> = store.load_all().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "kanji-dep:U+6797");
        assert_eq!(docs[0].parent_id(), "kanji:U+6797");
        assert_eq!(docs[0].prerequisite_ids(), vec!["kanji:U+6728".to_string()]);
    }

    #[test]
    fn kanji_grapheme_deps_map_through_variant_symbols() {
        use crate::core::grapheme::test_support::grapheme;
        use crate::core::GraphemeSet;

        // 海 contains 氵, which is a variant spelling of the Water grapheme.
        let dict = Dictionary::new(vec![entry("海", 9)]);
        let graphemes = GraphemeSet::new([grapheme("水", "Water", Some(4), &["氵"])]);
        let ids = ids_table(&[("海", "⿰氵每")]);
        let strokes = StrokeIndex::default();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let summary =
            generate_kanji_grapheme_deps(&dict, &graphemes, &mut resolver, &store, false).unwrap();
        assert_eq!(summary.with_deps, 1);

        let docs: Vec<ComponentDepDoc> = store.load_all().unwrap();
        assert_eq!(docs[0].id, "kanji-grapheme-dep:U+6D77");
        assert_eq!(docs[0].component_ids(), vec!["grapheme:U+6C34".to_string()]);
    }

    #[test]
    fn grapheme_deps_exclude_self_and_non_graphemes() {
        use crate::core::grapheme::test_support::grapheme;
        use crate::core::GraphemeSet;

        let graphemes = GraphemeSet::new([
            grapheme("木", "Tree", Some(4), &[]),
            grapheme("林", "Grove", Some(8), &[]),
        ]);
        // 林 decomposes into 木 (a grapheme) and, in this table, 艮 (not one).
        let ids = ids_table(&[("林", "⿰木艮")]);
        let strokes = StrokeIndex::default();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let summary =
            generate_grapheme_deps(&graphemes, &mut resolver, &store, false).unwrap();
        assert_eq!(summary.with_deps, 1);
        assert_eq!(summary.without_deps, 1);

        let docs: Vec<ComponentDepDoc> = store.load_all().unwrap();
        assert_eq!(docs[0].id, "grapheme-dep:U+6797");
        assert_eq!(docs[0].component_ids(), vec!["grapheme:U+6728".to_string()]);
    }

    #[test]
    fn stale_dependency_documents_are_deleted() {
        let dict = Dictionary::new(vec![entry("木", 4), entry("林", 8)]);
        let ids = ids_table(&[("木", "木"), ("林", "⿰木木")]);
        let strokes = StrokeIndex::default();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        // A leftover document for a kanji that no longer has prerequisites.
        let stale = PrerequisiteDepDoc::new(
            "kanji-dep:U+6728".to_string(),
            "kanji:U+6728".to_string(),
            &["kanji:U+4E00".to_string()],
        );
        store.write("kanji-dep:U+6728.json", &stale).unwrap();

        let summary = generate_kanji_deps(&dict, &mut resolver, &store, false).unwrap();
        assert_eq!(summary.report.deleted, vec!["kanji-dep:U+6728.json"]);
        assert!(!dir.path().join("kanji-dep:U+6728.json").exists());
    }
}
