//! End-to-end pipeline tests over the fixture corpus.

mod fixtures;

use std::collections::BTreeSet;
use std::fs;

use kanjigraph::gen;
use kanjigraph::store::{
    ComponentDepDoc, DocumentStore, KanjiDoc, LearningOrderDoc, PrerequisiteDepDoc,
    VariantGroupDoc,
};

#[test]
fn kanji_documents_cover_graded_entries() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let docs: Vec<KanjiDoc> = DocumentStore::new(config.paths().kanji_docs())
        .load_all()
        .unwrap();
    assert_eq!(docs.len(), 10);

    let bright = docs.iter().find(|d| d.symbol == "明").unwrap();
    assert_eq!(bright.id, "kanji:U+660E");
    assert_eq!(bright.unicode, "U+660E");
    assert_eq!(bright.stroke_count, Some(8));
    assert_eq!(bright.meanings, vec!["bright"]);
    assert_eq!(bright.jlpt_level, "unspecified");
}

#[test]
fn dependency_documents_match_decompositions() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let kanji_deps: Vec<PrerequisiteDepDoc> =
        DocumentStore::new(config.paths().kanji_dep_docs())
            .load_all()
            .unwrap();
    let by_id = |id: &str| kanji_deps.iter().find(|d| d.id == id).unwrap();

    // 明 decomposes into 日 + 月 with no operators retained.
    assert_eq!(
        by_id("kanji-dep:U+660E").prerequisite_ids(),
        vec!["kanji:U+65E5".to_string(), "kanji:U+6708".to_string()]
    );
    // 林 visually contains 木 twice; the edge is recorded once.
    assert_eq!(
        by_id("kanji-dep:U+6797").prerequisite_ids(),
        vec!["kanji:U+6728".to_string()]
    );
    // 海's only in-set prerequisite is 毎 (氵 is not a kanji).
    assert_eq!(
        by_id("kanji-dep:U+6D77").prerequisite_ids(),
        vec!["kanji:U+6BCE".to_string()]
    );

    let grapheme_deps: Vec<ComponentDepDoc> =
        DocumentStore::new(config.paths().grapheme_dep_docs())
            .load_all()
            .unwrap();
    assert_eq!(grapheme_deps.len(), 1);
    assert_eq!(grapheme_deps[0].id, "grapheme-dep:U+672C");
    assert_eq!(
        grapheme_deps[0].component_ids(),
        vec!["grapheme:U+4E00".to_string(), "grapheme:U+6728".to_string()]
    );

    let kg_deps: Vec<ComponentDepDoc> =
        DocumentStore::new(config.paths().kanji_grapheme_dep_docs())
            .load_all()
            .unwrap();
    let sea = kg_deps
        .iter()
        .find(|d| d.id == "kanji-grapheme-dep:U+6D77")
        .unwrap();
    // 氵 resolves to its own grapheme entry, not to Water.
    assert_eq!(sea.component_ids(), vec!["grapheme:U+6C35".to_string()]);
}

#[test]
fn variant_group_is_detected_from_names() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let groups: Vec<VariantGroupDoc> =
        DocumentStore::new(config.paths().variant_group_docs())
            .load_all()
            .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "grapheme-variant-group:water");
    assert_eq!(groups[0].name, "Water");
    assert_eq!(
        groups[0].member_ids(),
        vec!["grapheme:U+6C34".to_string(), "grapheme:U+6C35".to_string()]
    );
}

#[test]
fn grapheme_order_keeps_variant_group_contiguous() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let order_store = DocumentStore::new(config.paths().learning_order_docs());
    let positions =
        gen::load_default_order_positions(&order_store, gen::GRAPHEME_ORDER_DOC_ID).unwrap();

    // Hand-derived: 一 first, then the 4-stroke tier by popularity
    // (木 is used by 林 and 本), the Water group contiguous, 本 last.
    assert_eq!(positions["grapheme:U+4E00"], 0);
    assert_eq!(positions["grapheme:U+6728"], 1);
    assert_eq!(positions["grapheme:U+65E5"], 2);
    assert_eq!(positions["grapheme:U+6708"], 3);
    assert_eq!(positions["grapheme:U+6C34"], 4);
    assert_eq!(positions["grapheme:U+6C35"], 5);
    assert_eq!(positions["grapheme:U+672C"], 6);

    // Contiguity invariant: positions are exactly 0..n-1.
    let seen: BTreeSet<u32> = positions.values().copied().collect();
    assert_eq!(seen.len(), positions.len());
    assert_eq!(*seen.iter().next_back().unwrap() as usize, positions.len() - 1);
}

#[test]
fn kanji_order_respects_every_dependency_edge() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let order_store = DocumentStore::new(config.paths().learning_order_docs());
    let positions =
        gen::load_default_order_positions(&order_store, gen::KANJI_ORDER_DOC_ID).unwrap();
    assert_eq!(positions.len(), 10);

    // Readiness pulls 林 (graphemes ready by position 1) ahead of 明
    // (ready by position 3) within the 8-stroke tier.
    assert!(positions["kanji:U+6797"] < positions["kanji:U+660E"]);

    let dep_docs: Vec<PrerequisiteDepDoc> =
        DocumentStore::new(config.paths().kanji_dep_docs())
            .load_all()
            .unwrap();
    for doc in &dep_docs {
        let parent = positions[doc.parent_id()];
        for prerequisite in doc.prerequisite_ids() {
            assert!(
                positions[&prerequisite] < parent,
                "{prerequisite} not before {}",
                doc.parent_id()
            );
        }
    }
}

#[test]
fn pipeline_output_is_byte_identical_across_runs() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    for dir in [&dir_a, &dir_b] {
        fixtures::seed_data_dir(dir.path());
        let config = fixtures::config_for(dir.path());
        fixtures::run_pipeline(&config);
    }

    for collection in [
        "kanji/documents",
        "grapheme-dependency/documents",
        "kanji-dependency/documents",
        "kanji-grapheme-dependency/documents",
        "grapheme-variant-group/documents",
        "learning-order/documents",
        "reports",
    ] {
        let a_dir = dir_a.path().join(collection);
        let b_dir = dir_b.path().join(collection);
        let mut names: Vec<String> = fs::read_dir(&a_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert!(!names.is_empty(), "{collection} is empty");
        for name in names {
            let a = fs::read(a_dir.join(&name)).unwrap();
            let b = fs::read(b_dir.join(&name)).unwrap();
            assert_eq!(a, b, "{collection}/{name} differs between runs");
        }
    }
}

#[test]
fn rerunning_the_pipeline_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let order_path = config
        .paths()
        .learning_order_docs()
        .join("japanese-grapheme-learning-order-default.json");
    let before = fs::read(&order_path).unwrap();
    let mtime_before = fs::metadata(&order_path).unwrap().modified().unwrap();

    std::thread::sleep(std::time::Duration::from_millis(20));
    fixtures::run_pipeline(&config);

    assert_eq!(fs::read(&order_path).unwrap(), before);
    assert_eq!(
        fs::metadata(&order_path).unwrap().modified().unwrap(),
        mtime_before
    );
}

#[test]
fn learning_order_documents_validate_on_read_back() {
    let dir = tempfile::tempdir().unwrap();
    fixtures::seed_data_dir(dir.path());
    let config = fixtures::config_for(dir.path());
    fixtures::run_pipeline(&config);

    let docs: Vec<LearningOrderDoc> =
        DocumentStore::new(config.paths().learning_order_docs())
            .load_all()
            .unwrap();
    assert_eq!(docs.len(), 2);
    for doc in &docs {
        doc.validate(true).unwrap();
    }
}
