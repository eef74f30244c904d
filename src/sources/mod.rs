//! Decomposition and dictionary source adapters.
//!
//! - ids: primary source, an ideographic-description-sequence table
//! - strokes: fallback source, a pre-parsed stroke-diagram index
//! - dict: dictionary records (literal, strokes, grade, meanings, readings)
//!
//! Either decomposition source may be legitimately absent; lookups then
//! degrade to "no decomposition from this source" rather than failing.

pub mod dict;
pub mod ids;
pub mod strokes;

use thiserror::Error;

pub use dict::{DictEntry, Dictionary};
pub use ids::IdsTable;
pub use strokes::{StrokeIndex, StrokeSource};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
