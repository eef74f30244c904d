#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod gen;
pub mod paths;
pub mod sources;
pub mod store;
pub mod telemetry;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

// Re-export core types at crate root for convenience
pub use crate::core::{
    Codepoint, ComponentResolver, CoreError, Grade, Grapheme, GraphemeId, GraphemeSet,
    GraphemeVariant, KanjiId, Normalizer, SourceStatus, SourceTag,
};
