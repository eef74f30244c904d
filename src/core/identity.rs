//! Identity atoms.
//!
//! Codepoint: canonical `U+XXXX` form of a single character
//! GraphemeId: `grapheme:U+XXXX`
//! KanjiId: `kanji:U+XXXX`

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{CoreError, InvalidId};

/// A single Unicode code point in canonical `U+XXXX` form.
///
/// Four hex digits minimum, uppercase, widening to five for supplementary
/// plane characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codepoint(char);

impl Codepoint {
    pub fn new(c: char) -> Self {
        Self(c)
    }

    /// Codepoint of the first character of `s`, if `s` is a single character.
    pub fn of(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Self(c)),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let hex = s.strip_prefix("U+").ok_or_else(|| InvalidId::Codepoint {
            raw: s.to_string(),
            reason: "must start with 'U+'".into(),
        })?;
        if hex.len() < 4 || hex.len() > 6 || !hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()) {
            return Err(InvalidId::Codepoint {
                raw: s.to_string(),
                reason: "expected 4-6 uppercase hex digits".into(),
            }
            .into());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| InvalidId::Codepoint {
            raw: s.to_string(),
            reason: "hex value out of range".into(),
        })?;
        let c = char::from_u32(value).ok_or_else(|| InvalidId::Codepoint {
            raw: s.to_string(),
            reason: "not a valid scalar value".into(),
        })?;
        Ok(Self(c))
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0 as u32)
    }
}

impl fmt::Debug for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codepoint({self})")
    }
}

/// Grapheme identifier - `grapheme:U+XXXX` format.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphemeId(String);

impl GraphemeId {
    pub const PREFIX: &'static str = "grapheme:";

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let unicode = s.strip_prefix(Self::PREFIX).ok_or_else(|| InvalidId::Grapheme {
            raw: s.to_string(),
            reason: format!("must start with '{}'", Self::PREFIX),
        })?;
        Codepoint::parse(unicode).map_err(|_| InvalidId::Grapheme {
            raw: s.to_string(),
            reason: "suffix is not a U+XXXX codepoint".into(),
        })?;
        Ok(Self(s.to_string()))
    }

    pub fn from_codepoint(cp: Codepoint) -> Self {
        Self(format!("{}{}", Self::PREFIX, cp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `U+XXXX` part of the id.
    pub fn unicode_part(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl fmt::Display for GraphemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GraphemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphemeId({})", self.0)
    }
}

/// Kanji identifier - `kanji:U+XXXX` format.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KanjiId(String);

impl KanjiId {
    pub const PREFIX: &'static str = "kanji:";

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let unicode = s.strip_prefix(Self::PREFIX).ok_or_else(|| InvalidId::Kanji {
            raw: s.to_string(),
            reason: format!("must start with '{}'", Self::PREFIX),
        })?;
        Codepoint::parse(unicode).map_err(|_| InvalidId::Kanji {
            raw: s.to_string(),
            reason: "suffix is not a U+XXXX codepoint".into(),
        })?;
        Ok(Self(s.to_string()))
    }

    pub fn from_codepoint(cp: Codepoint) -> Self {
        Self(format!("{}{}", Self::PREFIX, cp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn unicode_part(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl fmt::Display for KanjiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for KanjiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KanjiId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codepoint_formats_four_digits_padded() {
        assert_eq!(Codepoint::new('木').to_string(), "U+6728");
        assert_eq!(Codepoint::new('\u{4E}').to_string(), "U+004E");
    }

    #[test]
    fn codepoint_formats_five_digits_for_supplementary() {
        assert_eq!(Codepoint::new('\u{20000}').to_string(), "U+20000");
    }

    #[test]
    fn codepoint_parse_roundtrip() {
        let cp = Codepoint::parse("U+6728").unwrap();
        assert_eq!(cp.as_char(), '木');
        assert!(Codepoint::parse("6728").is_err());
        assert!(Codepoint::parse("U+67G8").is_err());
        assert!(Codepoint::parse("U+6728abc").is_err());
    }

    #[test]
    fn codepoint_of_rejects_multi_char() {
        assert_eq!(Codepoint::of("木"), Some(Codepoint::new('木')));
        assert_eq!(Codepoint::of("木木"), None);
        assert_eq!(Codepoint::of(""), None);
    }

    #[test]
    fn grapheme_id_validates_prefix_and_codepoint() {
        let id = GraphemeId::parse("grapheme:U+6C34").unwrap();
        assert_eq!(id.unicode_part(), "U+6C34");
        assert!(GraphemeId::parse("kanji:U+6C34").is_err());
        assert!(GraphemeId::parse("grapheme:water").is_err());
    }

    #[test]
    fn kanji_id_from_codepoint() {
        let id = KanjiId::from_codepoint(Codepoint::new('明'));
        assert_eq!(id.as_str(), "kanji:U+660E");
    }
}
