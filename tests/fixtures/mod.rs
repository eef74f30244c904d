//! Shared corpus for integration tests.
//!
//! A miniature but complete data set: six curated graphemes (one composite,
//! one variant pair), a ten-entry dictionary, an IDS table, and a stroke
//! index. Small enough to reason about every expected position by hand.

use std::fs;
use std::path::Path;

use serde_json::json;
use time::OffsetDateTime;

use kanjigraph::config::Config;
use kanjigraph::core::{ComponentResolver, GraphemeSet, KanjiUniverse, Normalizer, propagate};
use kanjigraph::gen;
use kanjigraph::sources::{Dictionary, IdsTable, StrokeIndex};
use kanjigraph::store::{DocumentStore, GraphemeDoc};

pub fn seed_data_dir(root: &Path) {
    let grapheme_docs = root.join("grapheme/documents");
    fs::create_dir_all(&grapheme_docs).unwrap();

    let graphemes = [
        json!({"$id": "grapheme:U+4E00", "unicode": "U+4E00", "symbol": "一", "name": "One", "strokeCount": 1}),
        json!({"$id": "grapheme:U+6728", "unicode": "U+6728", "symbol": "木", "name": "Tree", "strokeCount": 4}),
        json!({"$id": "grapheme:U+65E5", "unicode": "U+65E5", "symbol": "日", "name": "Sun", "strokeCount": 4}),
        json!({"$id": "grapheme:U+6708", "unicode": "U+6708", "symbol": "月", "name": "Moon", "strokeCount": 4}),
        json!({
            "$id": "grapheme:U+6C34", "unicode": "U+6C34", "symbol": "水", "name": "Water",
            "strokeCount": 4,
            "variants": [{"unicode": "U+6C3A", "symbol": "氺"}]
        }),
        json!({"$id": "grapheme:U+6C35", "unicode": "U+6C35", "symbol": "氵", "name": "Water Variant", "strokeCount": 3}),
        json!({"$id": "grapheme:U+672C", "unicode": "U+672C", "symbol": "本", "name": "Book", "strokeCount": 5}),
    ];
    for doc in &graphemes {
        let filename = format!("{}.json", doc["$id"].as_str().unwrap());
        fs::write(
            grapheme_docs.join(filename),
            serde_json::to_string_pretty(doc).unwrap(),
        )
        .unwrap();
    }

    let sources = root.join("sources");
    fs::create_dir_all(&sources).unwrap();

    fs::write(
        sources.join("ids.txt"),
        concat!(
            "; fixture IDS table\n",
            "U+4E00\t一\t一\n",
            "U+6728\t木\t木\n",
            "U+672C\t本\t⿻木一\n",
            "U+660E\t明\t⿰日月\n",
            "U+6797\t林\t⿰木木\n",
            "U+6D77\t海\t⿰氵毎\n",
            "U+6BCE\t毎\t⿱𠂉母\n",
        ),
    )
    .unwrap();

    fs::write(
        sources.join("stroke-index.json"),
        serde_json::to_string_pretty(&json!({
            "日": [],
            "月": [],
            "水": [],
            "明": ["日", "月"],
            "氵": []
        }))
        .unwrap(),
    )
    .unwrap();

    let dictionary = json!([
        {"literal": "一", "strokeCounts": [1], "grade": 1, "meanings": ["one"], "onyomi": ["イチ"]},
        {"literal": "木", "strokeCounts": [4], "grade": 1, "meanings": ["tree"], "kunyomi": ["き"]},
        {"literal": "日", "strokeCounts": [4], "grade": 1, "meanings": ["day", "sun"]},
        {"literal": "月", "strokeCounts": [4], "grade": 1, "meanings": ["month", "moon"]},
        {"literal": "水", "strokeCounts": [4], "grade": 1, "meanings": ["water"]},
        {"literal": "本", "strokeCounts": [5], "grade": 1, "meanings": ["book", "origin"]},
        {"literal": "毎", "strokeCounts": [6], "grade": 2, "meanings": ["every"]},
        {"literal": "明", "strokeCounts": [8], "grade": 2, "meanings": ["bright"]},
        {"literal": "林", "strokeCounts": [8], "grade": 1, "meanings": ["grove"]},
        {"literal": "海", "strokeCounts": [9], "grade": 2, "meanings": ["sea"]}
    ]);
    fs::write(
        sources.join("dictionary.json"),
        serde_json::to_string_pretty(&dictionary).unwrap(),
    )
    .unwrap();
}

pub fn config_for(root: &Path) -> Config {
    let mut config = Config::default();
    config.data_dir = root.to_path_buf();
    config
}

pub fn load_graphemes(config: &Config) -> GraphemeSet {
    let store = DocumentStore::new(config.paths().grapheme_docs());
    let docs: Vec<GraphemeDoc> = store.load_all().unwrap();
    GraphemeSet::new(docs.iter().filter_map(GraphemeDoc::to_grapheme))
}

/// Run the whole pipeline with a pinned report timestamp.
pub fn run_pipeline(config: &Config) {
    let dict = Dictionary::load(&config.dictionary_path()).unwrap();
    let graphemes = load_graphemes(config);
    let ids = IdsTable::load(&config.ids_table_path());
    let strokes = StrokeIndex::load(&config.stroke_index_path());

    let mut resolver = ComponentResolver::new(&ids, &strokes);

    gen::generate_kanji_docs(&dict, &DocumentStore::new(config.paths().kanji_docs()), false)
        .unwrap();
    gen::generate_variant_groups(
        &graphemes,
        &DocumentStore::new(config.paths().variant_group_docs()),
        false,
    )
    .unwrap();
    gen::generate_grapheme_deps(
        &graphemes,
        &mut resolver,
        &DocumentStore::new(config.paths().grapheme_dep_docs()),
        false,
    )
    .unwrap();
    gen::generate_kanji_deps(
        &dict,
        &mut resolver,
        &DocumentStore::new(config.paths().kanji_dep_docs()),
        false,
    )
    .unwrap();
    gen::generate_kanji_grapheme_deps(
        &dict,
        &graphemes,
        &mut resolver,
        &DocumentStore::new(config.paths().kanji_grapheme_dep_docs()),
        false,
    )
    .unwrap();

    let normalizer = Normalizer::with_variant_fold(graphemes.variant_to_symbol());
    let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);
    let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);
    let report = gen::build_popularity_report(&universe, &counts, OffsetDateTime::UNIX_EPOCH);
    gen::write_popularity_report(&report, &config.paths().popularity_report()).unwrap();

    let order_store = DocumentStore::new(config.paths().learning_order_docs());
    let group_docs = DocumentStore::new(config.paths().variant_group_docs())
        .load_all()
        .unwrap();
    let dep_docs = DocumentStore::new(config.paths().grapheme_dep_docs())
        .load_all()
        .unwrap();
    gen::generate_grapheme_order(
        &graphemes,
        &group_docs,
        &gen::grapheme_popularity(&report),
        &dep_docs,
        &order_store,
        false,
    )
    .unwrap();

    let kanji_docs = DocumentStore::new(config.paths().kanji_docs()).load_all().unwrap();
    let kanji_dep_docs = DocumentStore::new(config.paths().kanji_dep_docs())
        .load_all()
        .unwrap();
    let kanji_grapheme_dep_docs = DocumentStore::new(config.paths().kanji_grapheme_dep_docs())
        .load_all()
        .unwrap();
    let grapheme_positions =
        gen::load_default_order_positions(&order_store, gen::GRAPHEME_ORDER_DOC_ID).unwrap();
    gen::generate_kanji_order(
        &kanji_docs,
        &kanji_dep_docs,
        &kanji_grapheme_dep_docs,
        &grapheme_positions,
        &gen::grade_map(&dict),
        &gen::kanji_popularity(&report),
        &order_store,
        false,
    )
    .unwrap();
}
