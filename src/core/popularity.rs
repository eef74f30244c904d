//! Component-usage popularity over the full character universe.
//!
//! Every universe entry seeds a traversal of its expanded component tree.
//! Each discovered child in the universe is credited once per parent
//! expansion; the first credit a child ever receives also queues the child
//! itself for expansion. A child that was already credited still counts for
//! the new parent edge, but its own subtree is not walked again.
//!
//! The resulting number is a count of distinct direct usages discovered
//! during the traversal, with subtree deduplication - deliberately not
//! "every distinct ancestor/descendant pair".

use std::collections::BTreeMap;

use super::grapheme::GraphemeSet;
use super::kanji::{KanjiUniverse, UniverseEntry};
use super::normalize::Normalizer;
use super::resolve::ComponentResolver;
use crate::sources::strokes::StrokeSource;

/// Normalized character -> usage credit count.
pub type PopularityMap = BTreeMap<String, u32>;

pub fn propagate<S: StrokeSource>(
    universe: &KanjiUniverse,
    graphemes: &GraphemeSet,
    resolver: &mut ComponentResolver<'_, S>,
    normalizer: &Normalizer,
) -> PopularityMap {
    propagate_in_order(
        universe.iter().map(|(_, entry)| entry),
        universe,
        graphemes,
        resolver,
        normalizer,
    )
}

/// Seeding order is explicit so tests can verify it does not change the
/// final counts.
fn propagate_in_order<'u, S: StrokeSource>(
    seeds: impl Iterator<Item = &'u UniverseEntry>,
    universe: &KanjiUniverse,
    graphemes: &GraphemeSet,
    resolver: &mut ComponentResolver<'_, S>,
    normalizer: &Normalizer,
) -> PopularityMap {
    let mut counts: PopularityMap = universe
        .iter()
        .map(|(normalized, _)| (normalized.clone(), 0))
        .collect();

    for seed in seeds {
        // Explicit work-list instead of recursion: component graphs nest
        // deeply and a credited node can keep receiving increments long
        // after its own children stop being expanded.
        let mut pending = vec![seed.original.clone()];

        while let Some(chr) = pending.pop() {
            let children =
                resolver.expanded_components_with_variants(&chr, graphemes, normalizer);
            for child in children {
                let normalized = normalizer.normalize(&child);
                let Some(count) = counts.get_mut(&normalized) else {
                    // Outside the universe: no credit, no expansion.
                    continue;
                };
                let first_credit = *count == 0;
                *count += 1;
                if first_credit {
                    pending.push(child);
                }
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::dict::{DictEntry, Dictionary};
    use crate::sources::ids::IdsTable;
    use crate::sources::strokes::StrokeIndex;

    fn dict_entry(literal: &str, strokes: u32) -> DictEntry {
        DictEntry {
            literal: literal.to_string(),
            stroke_count: Some(strokes),
            grade: None,
            meanings: Vec::new(),
            onyomi: Vec::new(),
            kunyomi: Vec::new(),
        }
    }

    fn ids_table(rows: &[(&str, &str)]) -> IdsTable {
        IdsTable::new(
            rows.iter()
                .map(|(c, ids)| (c.to_string(), ids.to_string()))
                .collect(),
        )
    }

    fn forest_fixture() -> (Dictionary, IdsTable) {
        let dict = Dictionary::new(vec![
            dict_entry("木", 4),
            dict_entry("林", 8),
            dict_entry("森", 12),
        ]);
        let ids = ids_table(&[("木", "木"), ("林", "⿰木木"), ("森", "⿱木林")]);
        (dict, ids)
    }

    #[test]
    fn direct_usages_are_credited_with_subtree_dedup() {
        let (dict, ids) = forest_fixture();
        let strokes = StrokeIndex::default();
        let graphemes = GraphemeSet::default();
        let normalizer = Normalizer::plain();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);

        let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);
        // 木: once from 林's seed pass, once directly from 森, once from
        // re-expanding 林 on its first credit.
        assert_eq!(counts["木"], 3);
        assert_eq!(counts["林"], 1);
        assert_eq!(counts["森"], 0);
    }

    #[test]
    fn counts_are_independent_of_seeding_order() {
        let (dict, ids) = forest_fixture();
        let strokes = StrokeIndex::default();
        let graphemes = GraphemeSet::default();
        let normalizer = Normalizer::plain();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);

        let forward = propagate_in_order(
            universe.iter().map(|(_, e)| e),
            &universe,
            &graphemes,
            &mut resolver,
            &normalizer,
        );
        let entries: Vec<_> = universe.iter().map(|(_, e)| e).collect();
        let reversed = propagate_in_order(
            entries.into_iter().rev(),
            &universe,
            &graphemes,
            &mut resolver,
            &normalizer,
        );
        assert_eq!(forward, reversed);
    }

    #[test]
    fn every_component_edge_implies_positive_popularity() {
        let (dict, ids) = forest_fixture();
        let strokes = StrokeIndex::default();
        let graphemes = GraphemeSet::default();
        let normalizer = Normalizer::plain();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);

        let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);
        for (_, entry) in universe.iter() {
            let components =
                resolver.expanded_components_with_variants(&entry.original, &graphemes, &normalizer);
            for component in components {
                let normalized = normalizer.normalize(&component);
                if universe.get(&normalized).is_some() {
                    assert!(counts[&normalized] >= 1, "{normalized} uncredited");
                }
            }
        }
    }

    #[test]
    fn repeated_component_in_one_parent_counts_once() {
        // 林 contains 木 twice visually; the component set collapses the
        // repeat, so a single parent credits 木 once.
        let dict = Dictionary::new(vec![dict_entry("木", 4), dict_entry("林", 8)]);
        let ids = ids_table(&[("木", "木"), ("林", "⿰木木")]);
        let strokes = StrokeIndex::default();
        let graphemes = GraphemeSet::default();
        let normalizer = Normalizer::plain();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);

        let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);
        assert_eq!(counts["木"], 1);
    }

    #[test]
    fn components_outside_the_universe_are_ignored() {
        let dict = Dictionary::new(vec![dict_entry("明", 8)]);
        let ids = ids_table(&[("明", "⿰日月")]);
        let strokes = StrokeIndex::default();
        let graphemes = GraphemeSet::default();
        let normalizer = Normalizer::plain();
        let mut resolver = ComponentResolver::new(&ids, &strokes);
        let universe = KanjiUniverse::build(&dict, &graphemes, &mut resolver, &normalizer);

        let counts = propagate(&universe, &graphemes, &mut resolver, &normalizer);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts["明"], 0);
    }
}
