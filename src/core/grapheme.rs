//! Graphemes: atomic or near-atomic visual building blocks.
//!
//! Graphemes are curated upstream and read-only here; this module indexes
//! them for symbol and variant lookup.

use std::collections::BTreeMap;

use tracing::warn;

use super::identity::GraphemeId;

/// An alternate spelling of a grapheme.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphemeVariant {
    pub symbol: String,
    pub name: Option<String>,
}

/// A curated grapheme entry.
#[derive(Clone, Debug)]
pub struct Grapheme {
    pub id: GraphemeId,
    pub symbol: String,
    pub name: String,
    pub name_aliases: Vec<String>,
    pub stroke_count: Option<u32>,
    pub variants: Vec<GraphemeVariant>,
}

/// The full grapheme inventory with symbol lookup maps.
#[derive(Clone, Debug, Default)]
pub struct GraphemeSet {
    by_id: BTreeMap<GraphemeId, Grapheme>,
    symbol_to_id: BTreeMap<String, GraphemeId>,
    variant_to_id: BTreeMap<String, GraphemeId>,
}

impl GraphemeSet {
    pub fn new(graphemes: impl IntoIterator<Item = Grapheme>) -> Self {
        let mut set = Self::default();
        for grapheme in graphemes {
            set.insert(grapheme);
        }
        set
    }

    fn insert(&mut self, mut grapheme: Grapheme) {
        // A grapheme's variants never include its own canonical symbol;
        // a violating variant is a curation defect and is dropped here.
        let before = grapheme.variants.len();
        grapheme.variants.retain(|v| v.symbol != grapheme.symbol);
        if grapheme.variants.len() != before {
            warn!(id = %grapheme.id, "variant equal to canonical symbol dropped");
        }

        if !grapheme.symbol.is_empty() {
            self.symbol_to_id
                .insert(grapheme.symbol.clone(), grapheme.id.clone());
        }
        for variant in &grapheme.variants {
            if !variant.symbol.is_empty() {
                self.variant_to_id
                    .insert(variant.symbol.clone(), grapheme.id.clone());
            }
        }
        self.by_id.insert(grapheme.id.clone(), grapheme);
    }

    pub fn get(&self, id: &GraphemeId) -> Option<&Grapheme> {
        self.by_id.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GraphemeId, &Grapheme)> {
        self.by_id.iter()
    }

    /// Resolve a symbol to a grapheme id, checking canonical symbols first
    /// and variant spellings second.
    pub fn lookup_symbol(&self, symbol: &str) -> Option<&GraphemeId> {
        self.symbol_to_id
            .get(symbol)
            .or_else(|| self.variant_to_id.get(symbol))
    }

    pub fn id_for_canonical(&self, symbol: &str) -> Option<&GraphemeId> {
        self.symbol_to_id.get(symbol)
    }

    pub fn id_for_variant(&self, symbol: &str) -> Option<&GraphemeId> {
        self.variant_to_id.get(symbol)
    }

    /// Variant symbol -> canonical symbol, for seeding the normalizer's
    /// variant fold.
    pub fn variant_to_symbol(&self) -> BTreeMap<String, String> {
        let mut fold = BTreeMap::new();
        for (variant_symbol, id) in &self.variant_to_id {
            if let Some(grapheme) = self.by_id.get(id) {
                fold.insert(variant_symbol.clone(), grapheme.symbol.clone());
            }
        }
        fold
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn variant_count(&self) -> usize {
        self.variant_to_id.len()
    }
}
