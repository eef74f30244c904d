//! Core capability errors (parsing, validation, identity).
//!
//! These are bounded and stable: core errors represent domain/refusal
//! states, not library implementation details.

use thiserror::Error;

/// Invalid identifier.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("codepoint `{raw}` is invalid: {reason}")]
    Codepoint { raw: String, reason: String },
    #[error("grapheme id `{raw}` is invalid: {reason}")]
    Grapheme { raw: String, reason: String },
    #[error("kanji id `{raw}` is invalid: {reason}")]
    Kanji { raw: String, reason: String },
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    #[error("grade `{0}` is not a known kanjidic grade tier")]
    UnknownGrade(u8),
}
