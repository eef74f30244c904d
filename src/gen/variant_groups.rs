//! Variant-group document generation from grapheme naming conventions.
//!
//! A grapheme named "X Variant" (with optional positional words such as
//! "X Side Variant") groups with the base grapheme named "X": exact name
//! match first, then name aliases, then a partial match on the first word
//! of the base name. Variants with no match at all are warned and skipped.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, warn};

use crate::core::{GraphemeId, GraphemeSet};
use crate::store::{DocumentStore, ReconcileReport, VariantGroupDoc};
use crate::Result;

#[derive(Debug)]
pub struct VariantGroupGenSummary {
    pub groups: usize,
    pub grouped_members: usize,
    pub unmatched: Vec<String>,
    pub report: ReconcileReport,
}

fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Group name -> member ids, derived from naming conventions.
fn find_variant_groups(
    graphemes: &GraphemeSet,
) -> (BTreeMap<String, BTreeSet<GraphemeId>>, Vec<String>) {
    let mut groups: BTreeMap<String, BTreeSet<GraphemeId>> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for (gid, grapheme) in graphemes.iter() {
        if !grapheme.name.contains("Variant") {
            continue;
        }

        let base_name = grapheme.name.replace(" Variant", "");
        let base_name = base_name.trim();

        // Exact name or alias match.
        let matches: Vec<(&GraphemeId, &str)> = graphemes
            .iter()
            .filter(|(other_id, other)| {
                *other_id != gid
                    && (other.name == base_name
                        || other.name_aliases.iter().any(|a| a.as_str() == base_name))
            })
            .map(|(other_id, other)| (other_id, other.name.as_str()))
            .collect();

        let matches = if matches.is_empty() {
            // Partial match on the first word of the base name.
            let first_word = base_name.split_whitespace().next().unwrap_or("");
            graphemes
                .iter()
                .filter(|(other_id, other)| *other_id != gid && other.name == first_word)
                .map(|(other_id, other)| (other_id, other.name.as_str()))
                .collect()
        } else {
            matches
        };

        if matches.is_empty() {
            warn!(name = %grapheme.name, base = %base_name, "no base grapheme found for variant");
            unmatched.push(grapheme.name.clone());
            continue;
        }

        let group_name = matches[0].1.to_string();
        let members = groups.entry(group_name).or_default();
        members.insert(gid.clone());
        for (match_id, _) in matches {
            members.insert(match_id.clone());
        }
    }

    (groups, unmatched)
}

pub fn generate_variant_groups(
    graphemes: &GraphemeSet,
    store: &DocumentStore,
    dry_run: bool,
) -> Result<VariantGroupGenSummary> {
    let (groups, unmatched) = find_variant_groups(graphemes);

    let mut desired: BTreeMap<String, VariantGroupDoc> = BTreeMap::new();
    let mut grouped_members = 0usize;

    for (group_name, members) in &groups {
        grouped_members += members.len();
        let doc_id = format!("grapheme-variant-group:{}", slugify(group_name));
        let member_ids: Vec<String> = members.iter().map(|m| m.as_str().to_string()).collect();
        let doc = VariantGroupDoc::new(doc_id.clone(), group_name.clone(), &member_ids);
        desired.insert(format!("{doc_id}.json"), doc);
    }

    let report = store.reconcile(&desired, dry_run)?;
    info!(
        groups = groups.len(),
        grouped_members,
        unmatched = unmatched.len(),
        dry_run,
        "variant groups reconciled"
    );

    Ok(VariantGroupGenSummary {
        groups: groups.len(),
        grouped_members,
        unmatched,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grapheme::test_support::grapheme;

    #[test]
    fn variant_groups_with_base_via_exact_name() {
        let graphemes = GraphemeSet::new([
            grapheme("水", "Water", Some(4), &[]),
            grapheme("氵", "Water Variant", Some(3), &[]),
            grapheme("木", "Tree", Some(4), &[]),
        ]);
        let (groups, unmatched) = find_variant_groups(&graphemes);

        assert!(unmatched.is_empty());
        assert_eq!(groups.len(), 1);
        let members = &groups["Water"];
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn positional_variants_fall_back_to_first_word() {
        let graphemes = GraphemeSet::new([
            grapheme("人", "Person", Some(2), &[]),
            grapheme("亻", "Person Side Variant", Some(2), &[]),
            grapheme("𠆢", "Person Top Variant", Some(2), &[]),
        ]);
        let (groups, unmatched) = find_variant_groups(&graphemes);

        assert!(unmatched.is_empty());
        assert_eq!(groups["Person"].len(), 3);
    }

    #[test]
    fn alias_match_counts_as_base() {
        let mut base = grapheme("辵", "Walk", Some(7), &[]);
        base.name_aliases = vec!["Movement".to_string()];
        let graphemes = GraphemeSet::new([
            base,
            grapheme("辶", "Movement Variant", Some(3), &[]),
        ]);
        let (groups, unmatched) = find_variant_groups(&graphemes);

        assert!(unmatched.is_empty());
        assert_eq!(groups["Walk"].len(), 2);
    }

    #[test]
    fn unmatched_variant_is_warned_and_skipped() {
        let graphemes = GraphemeSet::new([grapheme("灬", "Fire Bottom Variant", Some(4), &[])]);
        let (groups, unmatched) = find_variant_groups(&graphemes);

        assert!(groups.is_empty());
        assert_eq!(unmatched, vec!["Fire Bottom Variant".to_string()]);
    }

    #[test]
    fn documents_are_slug_keyed_with_sorted_members() {
        let graphemes = GraphemeSet::new([
            grapheme("水", "Water", Some(4), &[]),
            grapheme("氵", "Water Variant", Some(3), &[]),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let summary = generate_variant_groups(&graphemes, &store, false).unwrap();
        assert_eq!(summary.groups, 1);
        assert_eq!(summary.grouped_members, 2);

        let docs: Vec<VariantGroupDoc> = store.load_all().unwrap();
        assert_eq!(docs[0].id, "grapheme-variant-group:water");
        assert_eq!(docs[0].name, "Water");
        assert_eq!(
            docs[0].member_ids(),
            vec!["grapheme:U+6C34".to_string(), "grapheme:U+6C35".to_string()]
        );
    }
}
