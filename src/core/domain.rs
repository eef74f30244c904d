//! Domain enums.
//!
//! Grade: kanjidic grade tiers (1-6 kyouiku, 8 jouyou, 9-10 jinmeiyou)
//! SourceTag: which decomposition source answered for a character
//! SourceStatus: per-source coverage classification

use serde::{Deserialize, Serialize};

use super::error::CoreError;

/// Kanjidic grade tier.
///
/// Stored by its kanjidic number so that sorting by grade matches the
/// dictionary's own tier order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    pub fn new(n: u8) -> Result<Self, CoreError> {
        match n {
            1..=6 | 8 | 9 | 10 => Ok(Self(n)),
            _ => Err(CoreError::UnknownGrade(n)),
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Grade 1 (kyouiku)",
            2 => "Grade 2 (kyouiku)",
            3 => "Grade 3 (kyouiku)",
            4 => "Grade 4 (kyouiku)",
            5 => "Grade 5 (kyouiku)",
            6 => "Grade 6 (kyouiku)",
            8 => "Grade 8 (jouyou remainder)",
            9 => "Jinmeiyou",
            _ => "Jinmeiyou variant",
        }
    }
}

/// Which source answered a component lookup.
///
/// The exact strings are load-bearing: coverage statistics downstream key
/// on them, so they serialize verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "fallback")]
    Fallback,
    #[serde(rename = "primary-atomic")]
    PrimaryAtomic,
    #[serde(rename = "fallback-atomic")]
    FallbackAtomic,
    #[serde(rename = "absent")]
    Absent,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
            Self::PrimaryAtomic => "primary-atomic",
            Self::FallbackAtomic => "fallback-atomic",
            Self::Absent => "absent",
        }
    }
}

/// Coverage classification of one character in one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Present with a real decomposition.
    Decomposed,
    /// Present but with no decomposition beyond itself.
    Atomic,
    /// Not present in the source at all.
    #[serde(rename = "none")]
    Missing,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decomposed => "decomposed",
            Self::Atomic => "atomic",
            Self::Missing => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_accepts_only_kanjidic_tiers() {
        for n in [1, 2, 3, 4, 5, 6, 8, 9, 10] {
            assert_eq!(Grade::new(n).unwrap().number(), n);
        }
        assert!(Grade::new(0).is_err());
        assert!(Grade::new(7).is_err());
        assert!(Grade::new(11).is_err());
    }

    #[test]
    fn source_tags_serialize_verbatim() {
        assert_eq!(
            serde_json::to_string(&SourceTag::PrimaryAtomic).unwrap(),
            "\"primary-atomic\""
        );
        assert_eq!(
            serde_json::to_string(&SourceTag::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(serde_json::to_string(&SourceTag::Absent).unwrap(), "\"absent\"");
    }

    #[test]
    fn source_status_missing_serializes_as_none() {
        assert_eq!(
            serde_json::to_string(&SourceStatus::Missing).unwrap(),
            "\"none\""
        );
    }
}
