//! Core domain types and algorithms.
//!
//! Module hierarchy follows type dependency order:
//! - identity: Codepoint, GraphemeId, KanjiId
//! - domain: Grade, SourceTag, SourceStatus
//! - normalize: Normalizer (compatibility + radical fold + variant fold)
//! - grapheme: Grapheme, GraphemeSet
//! - kanji: KanjiUniverse (normalized dictionary universe)
//! - resolve: ComponentResolver (two-source reconciliation)
//! - popularity: component-usage propagation
//! - order: learning-order computation and validation

pub mod domain;
pub mod error;
pub mod grapheme;
pub mod identity;
pub mod kanji;
pub mod normalize;
pub mod order;
pub mod popularity;
pub mod resolve;

pub use domain::{Grade, SourceStatus, SourceTag};
pub use error::{CoreError, InvalidId};
pub use grapheme::{Grapheme, GraphemeSet, GraphemeVariant};
pub use identity::{Codepoint, GraphemeId, KanjiId};
pub use kanji::{KanjiUniverse, UniverseEntry};
pub use normalize::Normalizer;
pub use order::{
    GroupAnomaly, OrderViolation, VariantGroupMap, grapheme_order, grapheme_readiness,
    kanji_order, validate_order, variant_group_map,
};
pub use popularity::{PopularityMap, propagate};
pub use resolve::ComponentResolver;
