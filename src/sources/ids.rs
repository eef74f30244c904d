//! Primary decomposition source: ideographic description sequences.
//!
//! Table file format, one entry per line:
//!
//! ```text
//! U+XXXX<TAB>char<TAB>IDS[@apparent=IDS]
//! ```
//!
//! Lines starting with `;` are comments. The IDS string mixes spatial
//! composition operators (U+2FF0-2FFF) with component characters and
//! occasional `&NAME;` entity escapes.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::warn;

/// Start of the ideographic description operator block.
const IDS_OPERATOR_FIRST: char = '\u{2FF0}';
/// End of the operator block (exclusive); everything below U+3000.
const IDS_OPERATOR_LAST: char = '\u{2FFF}';

/// First code point of the CJK radical/symbol range. Anything below is
/// punctuation, ASCII, or whitespace and never a component.
const CJK_RANGE_START: u32 = 0x2E80;

fn is_ids_operator(c: char) -> bool {
    (IDS_OPERATOR_FIRST..=IDS_OPERATOR_LAST).contains(&c)
}

/// Remove `&NAME;` entity escapes. Unterminated escapes are kept as-is.
fn strip_entities(ids: &str) -> String {
    let mut out = String::with_capacity(ids.len());
    let mut rest = ids;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        match rest[start..].find(';') {
            Some(end) => rest = &rest[start + end + 1..],
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Extract the component character set from an IDS string.
///
/// Discards operators, entity escapes, whitespace, and anything below the
/// CJK radical range; deduplicates the remainder.
pub fn extract_components(ids: &str) -> BTreeSet<String> {
    let mut components = BTreeSet::new();
    for c in strip_entities(ids).chars() {
        if is_ids_operator(c) || c.is_whitespace() || (c as u32) < CJK_RANGE_START {
            continue;
        }
        components.insert(c.to_string());
    }
    components
}

/// The loaded IDS table: character -> raw IDS string.
#[derive(Clone, Debug, Default)]
pub struct IdsTable {
    entries: BTreeMap<String, String>,
}

impl IdsTable {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load the table from disk.
    ///
    /// An absent file degrades to an empty table: the fallback source may
    /// still cover the characters.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                warn!(path = %path.display(), %err, "ids table unavailable");
                return Self::default();
            }
        };

        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let mut parts = line.split('\t');
            let (Some(_codepoint), Some(chr), Some(ids)) =
                (parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            // Strip the @apparent= alternative sequence if present.
            let ids = match ids.split_once("@apparent=") {
                Some((head, _)) => head.trim(),
                None => ids,
            };
            entries.insert(chr.to_string(), ids.to_string());
        }
        Self { entries }
    }

    pub fn contains(&self, chr: &str) -> bool {
        self.entries.contains_key(chr)
    }

    pub fn ids(&self, chr: &str) -> Option<&str> {
        self.entries.get(chr).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
