//! Generators: wire the core algorithms to the document store.
//!
//! Each generator computes its full desired document set from the sources,
//! then reconciles it against the collection directory. All of them take a
//! dry-run flag that reports the create/update/delete partition without
//! touching disk.

pub mod deps;
pub mod kanji;
pub mod orders;
pub mod popularity;
pub mod variant_groups;

pub use deps::{
    DepGenSummary, generate_grapheme_deps, generate_kanji_deps, generate_kanji_grapheme_deps,
};
pub use kanji::{KanjiGenSummary, generate_kanji_docs};
pub use orders::{
    GRAPHEME_ORDER_DOC_ID, KANJI_ORDER_DOC_ID, OrderGenSummary, generate_grapheme_order,
    generate_kanji_order, grade_map, load_default_order_positions,
};
pub use popularity::{
    PopularityReport, ReportEntry, build_popularity_report, grapheme_popularity,
    kanji_popularity, load_popularity_report, write_popularity_report,
};
pub use variant_groups::{VariantGroupGenSummary, generate_variant_groups};
