//! Component resolution: reconciling two decomposition sources.
//!
//! Two lookup modes with different jobs:
//! - `components`: tried-in-order (primary, then fallback), tagged with the
//!   answering source. Feeds coverage statistics.
//! - `expanded_components`: permissive union of both sources over both the
//!   original and normalized spellings. Feeds the dependency graph and
//!   popularity propagation.
//!
//! Both source lookups are memoized per character. The caches are pure
//! char -> components maps, independent of the normalizer in use, so they
//! stay valid across normalizer configurations; `clear_caches` exists for
//! reprocessing with different source tables in tests.

use std::collections::{BTreeSet, HashMap};

use super::domain::{SourceStatus, SourceTag};
use super::grapheme::GraphemeSet;
use super::normalize::Normalizer;
use crate::sources::ids::{self, IdsTable};
use crate::sources::strokes::StrokeSource;

pub struct ComponentResolver<'a, S: StrokeSource> {
    ids: &'a IdsTable,
    strokes: &'a S,
    primary_cache: HashMap<String, BTreeSet<String>>,
    fallback_cache: HashMap<String, BTreeSet<String>>,
}

impl<'a, S: StrokeSource> ComponentResolver<'a, S> {
    pub fn new(ids: &'a IdsTable, strokes: &'a S) -> Self {
        Self {
            ids,
            strokes,
            primary_cache: HashMap::new(),
            fallback_cache: HashMap::new(),
        }
    }

    /// Drop all memoized lookups.
    pub fn clear_caches(&mut self) {
        self.primary_cache.clear();
        self.fallback_cache.clear();
    }

    /// Components of `chr` according to the primary (IDS) source.
    ///
    /// A self-description (the IDS is exactly the character itself) means
    /// the source considers the character atomic, not self-referential.
    fn primary_components(&mut self, chr: &str) -> BTreeSet<String> {
        if let Some(cached) = self.primary_cache.get(chr) {
            return cached.clone();
        }

        let components = match self.ids.ids(chr) {
            None => BTreeSet::new(),
            Some(sequence) => {
                let mut components = ids::extract_components(sequence);
                if components.len() == 1 && components.contains(chr) {
                    components.clear();
                }
                components.remove(chr);
                components
            }
        };

        self.primary_cache.insert(chr.to_string(), components.clone());
        components
    }

    /// Direct children of `chr` according to the fallback (stroke) source.
    fn fallback_components(&mut self, chr: &str) -> BTreeSet<String> {
        if let Some(cached) = self.fallback_cache.get(chr) {
            return cached.clone();
        }
        let components = self.strokes.children(chr);
        self.fallback_cache.insert(chr.to_string(), components.clone());
        components
    }

    /// Larger of the original-vs-normalized lookups, ties favoring the
    /// original spelling.
    fn best_of<F>(&mut self, chr: &str, normalized: &str, mut lookup: F) -> BTreeSet<String>
    where
        F: FnMut(&mut Self, &str) -> BTreeSet<String>,
    {
        let original = lookup(&mut *self, chr);
        if chr == normalized {
            return original;
        }
        let renormalized = lookup(&mut *self, normalized);
        if original.len() >= renormalized.len() {
            original
        } else {
            renormalized
        }
    }

    /// Tried-in-order resolution: primary first, then fallback, then the
    /// atomic/absent classification.
    pub fn components(
        &mut self,
        chr: &str,
        normalizer: &Normalizer,
    ) -> (BTreeSet<String>, SourceTag) {
        let normalized = normalizer.normalize(chr);

        let primary = self.best_of(chr, &normalized, Self::primary_components);
        if !primary.is_empty() {
            return (primary, SourceTag::Primary);
        }

        let fallback = self.best_of(chr, &normalized, Self::fallback_components);
        if !fallback.is_empty() {
            return (fallback, SourceTag::Fallback);
        }

        if self.ids.contains(chr) || self.ids.contains(&normalized) {
            return (BTreeSet::new(), SourceTag::PrimaryAtomic);
        }
        if self.strokes.contains(chr) || self.strokes.contains(&normalized) {
            return (BTreeSet::new(), SourceTag::FallbackAtomic);
        }
        (BTreeSet::new(), SourceTag::Absent)
    }

    /// Per-source coverage classification over both spellings.
    pub fn library_status(
        &mut self,
        chr: &str,
        normalizer: &Normalizer,
    ) -> (SourceStatus, SourceStatus) {
        let normalized = normalizer.normalize(chr);

        let primary = if self.ids.contains(chr) || self.ids.contains(&normalized) {
            let decomposed = !self.primary_components(chr).is_empty()
                || (chr != normalized && !self.primary_components(&normalized).is_empty());
            if decomposed {
                SourceStatus::Decomposed
            } else {
                SourceStatus::Atomic
            }
        } else {
            SourceStatus::Missing
        };

        let fallback = if self.strokes.contains(chr) || self.strokes.contains(&normalized) {
            let decomposed = !self.fallback_components(chr).is_empty()
                || (chr != normalized && !self.fallback_components(&normalized).is_empty());
            if decomposed {
                SourceStatus::Decomposed
            } else {
                SourceStatus::Atomic
            }
        } else {
            SourceStatus::Missing
        };

        (primary, fallback)
    }

    /// Union of all four lookups (both sources, both spellings), minus the
    /// character itself and its normalized form.
    pub fn expanded_components(&mut self, chr: &str, normalizer: &Normalizer) -> BTreeSet<String> {
        let normalized = normalizer.normalize(chr);
        let mut union = BTreeSet::new();

        union.extend(self.primary_components(chr));
        union.extend(self.fallback_components(chr));
        if chr != normalized {
            union.extend(self.primary_components(&normalized));
            union.extend(self.fallback_components(&normalized));
        }

        union.remove(chr);
        union.remove(&normalized);
        union
    }

    /// Expanded union, elaborated through one level of variant expansion:
    /// any discovered component that resolves to a grapheme with registered
    /// variant spellings also contributes those variants' expanded
    /// components. One layer only - the variants' own variants are not
    /// chased.
    pub fn expanded_components_with_variants(
        &mut self,
        chr: &str,
        graphemes: &GraphemeSet,
        normalizer: &Normalizer,
    ) -> BTreeSet<String> {
        let union = self.expanded_components(chr, normalizer);
        let mut elaborated = union.clone();

        for component in &union {
            let normalized = normalizer.normalize(component);
            let Some(id) = graphemes.lookup_symbol(&normalized) else {
                continue;
            };
            let Some(grapheme) = graphemes.get(id) else {
                continue;
            };
            let variant_symbols: Vec<String> =
                grapheme.variants.iter().map(|v| v.symbol.clone()).collect();
            for symbol in variant_symbols {
                elaborated.extend(self.expanded_components(&symbol, normalizer));
            }
        }

        elaborated.remove(chr);
        let normalized_self = normalizer.normalize(chr);
        elaborated.remove(&normalized_self);
        elaborated
    }
}
