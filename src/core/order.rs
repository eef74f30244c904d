//! Learning-order computation and validation.
//!
//! Two tracks with different sort keys:
//! - graphemes: (stroke count asc, popularity desc, id asc), with variant
//!   groups kept contiguous at the base member's position
//! - kanji: (stroke count asc, grapheme readiness asc, grade asc,
//!   popularity desc, id asc)
//!
//! The order is a pedagogical heuristic, not a topological sort: validation
//! reports dependency violations but never reorders around them. Consumers
//! that need hard gating read the dependency graph directly.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::warn;

use super::domain::Grade;
use super::grapheme::GraphemeSet;
use super::identity::{GraphemeId, KanjiId};

/// Stroke-count sentinel for items with no known count; sorts last.
const UNKNOWN_STROKES: u32 = 999;
/// Grade sentinel for ungraded kanji; sorts after every real tier.
const UNKNOWN_GRADE: u8 = 99;
/// Readiness sentinel for kanji with no readiness data at all; least ready.
const UNKNOWN_READINESS: i64 = 9999;
/// Readiness for kanji whose grapheme components have no recorded position;
/// most ready.
const NO_POSITIONED_COMPONENTS: i64 = -1;

/// The name marker that distinguishes variant members from the base.
const VARIANT_MARKER: &str = "Variant";

/// A variant group whose base-member detection found zero or more than one
/// candidate. A data-quality defect: silent resolution would bias the
/// learning order, so it is surfaced to the caller.
#[derive(Clone, Debug)]
pub struct GroupAnomaly {
    pub group_id: String,
    /// The candidates whose names lack the variant marker; empty or 2+.
    pub base_candidates: Vec<GraphemeId>,
}

/// Membership maps for variant groups.
///
/// `group_members` lists each group base-first, remaining members sorted by
/// id - fully deterministic even for anomalous groups.
#[derive(Clone, Debug, Default)]
pub struct VariantGroupMap {
    member_to_group: BTreeMap<GraphemeId, String>,
    group_members: BTreeMap<String, Vec<GraphemeId>>,
}

impl VariantGroupMap {
    pub fn group_of(&self, member: &GraphemeId) -> Option<&str> {
        self.member_to_group.get(member).map(String::as_str)
    }

    pub fn members(&self, group_id: &str) -> Option<&[GraphemeId]> {
        self.group_members.get(group_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.group_members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.member_to_group.len()
    }
}

/// Build membership maps from raw group membership lists.
///
/// The base member is the one whose name lacks the variant marker. Groups
/// with zero or multiple base candidates are returned as anomalies; their
/// member order stays deterministic (sorted bases, then sorted variants).
pub fn variant_group_map(
    groups: &BTreeMap<String, Vec<GraphemeId>>,
    graphemes: &GraphemeSet,
) -> (VariantGroupMap, Vec<GroupAnomaly>) {
    let mut map = VariantGroupMap::default();
    let mut anomalies = Vec::new();

    for (group_id, members) in groups {
        let mut bases: Vec<GraphemeId> = Vec::new();
        let mut variants: Vec<GraphemeId> = Vec::new();

        for member in members {
            let is_variant = graphemes
                .get(member)
                .map(|g| g.name.contains(VARIANT_MARKER))
                .unwrap_or(false);
            if is_variant {
                variants.push(member.clone());
            } else {
                bases.push(member.clone());
            }
        }

        if bases.len() != 1 {
            warn!(
                group = %group_id,
                candidates = bases.len(),
                "variant group base detection is ambiguous"
            );
            anomalies.push(GroupAnomaly {
                group_id: group_id.clone(),
                base_candidates: bases.clone(),
            });
        }

        bases.sort();
        variants.sort();
        let mut ordered = bases;
        ordered.extend(variants);

        for member in &ordered {
            map.member_to_group
                .insert(member.clone(), group_id.clone());
        }
        map.group_members.insert(group_id.clone(), ordered);
    }

    (map, anomalies)
}

/// Compute the grapheme learning order.
///
/// Variant groups are collapsed to a single sortable unit keyed by the base
/// member; the whole group is emitted contiguously at the position the base
/// would occupy.
pub fn grapheme_order(
    graphemes: &GraphemeSet,
    popularity: &BTreeMap<GraphemeId, u32>,
    groups: &VariantGroupMap,
) -> Vec<GraphemeId> {
    let mut grouped: BTreeSet<GraphemeId> = BTreeSet::new();
    let mut entries: Vec<((u32, Reverse<u32>, GraphemeId), Vec<GraphemeId>)> = Vec::new();

    for (id, grapheme) in graphemes.iter() {
        if grouped.contains(id) {
            continue;
        }

        if let Some(group_id) = groups.group_of(id) {
            let members = groups
                .members(group_id)
                .expect("member maps to a known group");
            if members.iter().any(|m| grouped.contains(m)) {
                continue;
            }
            grouped.extend(members.iter().cloned());

            let base = &members[0];
            let stroke_count = graphemes
                .get(base)
                .and_then(|g| g.stroke_count)
                .unwrap_or(UNKNOWN_STROKES);
            let pop = popularity.get(base).copied().unwrap_or(0);
            entries.push(((stroke_count, Reverse(pop), base.clone()), members.to_vec()));
        } else {
            let stroke_count = grapheme.stroke_count.unwrap_or(UNKNOWN_STROKES);
            let pop = popularity.get(id).copied().unwrap_or(0);
            entries.push(((stroke_count, Reverse(pop), id.clone()), vec![id.clone()]));
        }
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().flat_map(|(_, ids)| ids).collect()
}

/// Readiness score per kanji: the maximum grapheme-order position among its
/// grapheme components. Lower means the learner has every needed grapheme
/// earlier.
pub fn grapheme_readiness(
    kanji_grapheme_deps: &BTreeMap<KanjiId, Vec<GraphemeId>>,
    grapheme_positions: &BTreeMap<GraphemeId, usize>,
) -> BTreeMap<KanjiId, i64> {
    let mut readiness = BTreeMap::new();
    for (kanji_id, grapheme_ids) in kanji_grapheme_deps {
        let mut max_pos = NO_POSITIONED_COMPONENTS;
        for gid in grapheme_ids {
            if let Some(&pos) = grapheme_positions.get(gid) {
                max_pos = max_pos.max(pos as i64);
            }
        }
        readiness.insert(kanji_id.clone(), max_pos);
    }
    readiness
}

/// Compute the kanji learning order.
pub fn kanji_order(
    stroke_counts: &BTreeMap<KanjiId, Option<u32>>,
    readiness: &BTreeMap<KanjiId, i64>,
    grades: &BTreeMap<KanjiId, Grade>,
    popularity: &BTreeMap<KanjiId, u32>,
) -> Vec<KanjiId> {
    let mut entries: Vec<((u32, i64, u8, Reverse<u32>, KanjiId), KanjiId)> = Vec::new();

    for (id, stroke_count) in stroke_counts {
        let strokes = stroke_count.unwrap_or(UNKNOWN_STROKES);
        let ready = readiness.get(id).copied().unwrap_or(UNKNOWN_READINESS);
        let grade = grades.get(id).map(Grade::number).unwrap_or(UNKNOWN_GRADE);
        let pop = popularity.get(id).copied().unwrap_or(0);
        entries.push(((strokes, ready, grade, Reverse(pop), id.clone()), id.clone()));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter().map(|(_, id)| id).collect()
}

/// A dependency edge the computed order contradicts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderViolation {
    pub component_id: String,
    pub component_symbol: String,
    pub component_position: usize,
    pub parent_id: String,
    pub parent_symbol: String,
    pub parent_position: usize,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) at position {} should come before {} ({}) at position {}",
            self.component_symbol,
            self.component_id,
            self.component_position,
            self.parent_symbol,
            self.parent_id,
            self.parent_position
        )
    }
}

/// Check the final position assignment against the dependency relation.
///
/// Edges whose endpoints are not both positioned are skipped. Violations
/// are reported, never repaired.
pub fn validate_order<I>(
    ordered: &[I],
    deps: &BTreeMap<I, Vec<I>>,
    symbols: &BTreeMap<I, String>,
) -> Vec<OrderViolation>
where
    I: Ord + Clone + fmt::Display,
{
    let positions: BTreeMap<&I, usize> =
        ordered.iter().enumerate().map(|(i, id)| (id, i)).collect();
    let symbol = |id: &I| -> String {
        symbols.get(id).cloned().unwrap_or_else(|| "?".to_string())
    };

    let mut violations = Vec::new();
    for (parent, components) in deps {
        let Some(&parent_position) = positions.get(parent) else {
            continue;
        };
        for component in components {
            let Some(&component_position) = positions.get(component) else {
                continue;
            };
            if component_position >= parent_position {
                violations.push(OrderViolation {
                    component_id: component.to_string(),
                    component_symbol: symbol(component),
                    component_position,
                    parent_id: parent.to_string(),
                    parent_symbol: symbol(parent),
                    parent_position,
                });
            }
        }
    }
    violations
}
