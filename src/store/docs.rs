//! Serde shapes for the document collections.
//!
//! All documents are keyed by a `$id` field. Relational documents point at
//! other documents through `connectors` objects holding only a `$id`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{Grapheme, GraphemeId, GraphemeVariant};

use super::StoreError;

/// A reference to another document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    #[serde(rename = "$id")]
    pub id: String,
}

impl Connector {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

// ---------------------------------------------------------------------------
// Graphemes (curated input)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphemeVariantDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphemeDoc {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "nameAliases",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub name_aliases: Vec<String>,
    #[serde(rename = "strokeCount", default, skip_serializing_if = "Option::is_none")]
    pub stroke_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<GraphemeVariantDoc>,
}

impl GraphemeDoc {
    /// Convert into the core grapheme type; `None` when the id does not
    /// parse or the document lacks a symbol.
    pub fn to_grapheme(&self) -> Option<Grapheme> {
        let id = GraphemeId::parse(&self.id).ok()?;
        let symbol = self.symbol.clone()?;
        Some(Grapheme {
            id,
            symbol,
            name: self.name.clone().unwrap_or_default(),
            name_aliases: self.name_aliases.clone(),
            stroke_count: self.stroke_count,
            variants: self
                .variants
                .iter()
                .map(|v| GraphemeVariant {
                    symbol: v.symbol.clone(),
                    name: v.name.clone(),
                })
                .collect(),
        })
    }
}

// ---------------------------------------------------------------------------
// Kanji (generated output)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KanjiDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub unicode: String,
    pub symbol: String,
    pub meanings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub onyomi: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kunyomi: Vec<String>,
    #[serde(rename = "strokeCount", default, skip_serializing_if = "Option::is_none")]
    pub stroke_count: Option<u32>,
    #[serde(rename = "jlptLevel")]
    pub jlpt_level: String,
}

// ---------------------------------------------------------------------------
// Dependency documents
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParentConnector {
    pub parent: Connector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentConnector {
    pub component: Connector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentItem {
    pub connectors: ComponentConnector,
}

/// Parent composed of components (grapheme-dep and kanji-grapheme-dep).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentDepDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub connectors: ParentConnector,
    pub many: Vec<ComponentItem>,
}

impl ComponentDepDoc {
    pub fn new(id: String, parent_id: String, component_ids: &[String]) -> Self {
        Self {
            id,
            connectors: ParentConnector {
                parent: Connector::new(parent_id),
            },
            many: component_ids
                .iter()
                .map(|cid| ComponentItem {
                    connectors: ComponentConnector {
                        component: Connector::new(cid.clone()),
                    },
                })
                .collect(),
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.connectors.parent.id
    }

    /// Component ids, deduplicated, first occurrence order preserved.
    pub fn component_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        for item in &self.many {
            let id = &item.connectors.component.id;
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrerequisiteConnector {
    pub prerequisite: Connector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrerequisiteItem {
    pub connectors: PrerequisiteConnector,
}

/// Parent kanji gated on prerequisite kanji (kanji-dep).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrerequisiteDepDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub connectors: ParentConnector,
    pub many: Vec<PrerequisiteItem>,
}

impl PrerequisiteDepDoc {
    pub fn new(id: String, parent_id: String, prerequisite_ids: &[String]) -> Self {
        Self {
            id,
            connectors: ParentConnector {
                parent: Connector::new(parent_id),
            },
            many: prerequisite_ids
                .iter()
                .map(|pid| PrerequisiteItem {
                    connectors: PrerequisiteConnector {
                        prerequisite: Connector::new(pid.clone()),
                    },
                })
                .collect(),
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.connectors.parent.id
    }

    pub fn prerequisite_ids(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut ids = Vec::new();
        for item in &self.many {
            let id = &item.connectors.prerequisite.id;
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

// ---------------------------------------------------------------------------
// Variant groups
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberConnector {
    pub member: Connector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberItem {
    pub connectors: MemberConnector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariantGroupDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub many: Vec<MemberItem>,
}

impl VariantGroupDoc {
    pub fn new(id: String, name: String, member_ids: &[String]) -> Self {
        Self {
            id,
            name,
            many: member_ids
                .iter()
                .map(|mid| MemberItem {
                    connectors: MemberConnector {
                        member: Connector::new(mid.clone()),
                    },
                })
                .collect(),
        }
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.many
            .iter()
            .map(|m| m.connectors.member.id.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Learning orders
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderData {
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "trackId")]
    pub track_id: String,
    #[serde(rename = "trackName")]
    pub track_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemConnector {
    pub item: Connector,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionData {
    pub position: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderItem {
    pub connectors: ItemConnector,
    pub data: PositionData,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LearningOrderDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub data: OrderData,
    pub many: Vec<OrderItem>,
}

fn valid_track_id(track_id: &str) -> bool {
    let mut chars = track_id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
        return false;
    }
    track_id.len() <= 64
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl LearningOrderDoc {
    pub fn new(id: String, data: OrderData, ordered_item_ids: &[String]) -> Self {
        Self {
            id,
            data,
            many: ordered_item_ids
                .iter()
                .enumerate()
                .map(|(position, item_id)| OrderItem {
                    connectors: ItemConnector {
                        item: Connector::new(item_id.clone()),
                    },
                    data: PositionData {
                        position: position as u32,
                    },
                })
                .collect(),
        }
    }

    /// Semantic invariants the writer guarantees; any violation on read-back
    /// means corruption and is a hard failure.
    pub fn validate(&self, intended_default_track: bool) -> Result<(), StoreError> {
        let invalid = |reason: &str| StoreError::InvalidDocument {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.data.content_type.trim().is_empty() {
            return Err(invalid("data.contentType is required"));
        }
        if !valid_track_id(&self.data.track_id) {
            return Err(invalid(
                "data.trackId is required and must match ^[a-z0-9][a-z0-9-]{0,63}$",
            ));
        }
        if intended_default_track && self.data.track_id != "default" {
            return Err(invalid(
                "documents intended as the default track must set data.trackId to 'default'",
            ));
        }
        if self.many.is_empty() {
            return Err(invalid("many must be a non-empty array"));
        }

        let mut item_ids = BTreeSet::new();
        let mut positions = BTreeSet::new();
        for entry in &self.many {
            let item_id = &entry.connectors.item.id;
            if item_id.trim().is_empty() {
                return Err(invalid("connectors.item.$id is required"));
            }
            if !item_ids.insert(item_id.clone()) {
                return Err(invalid("many entries cannot repeat the same connectors.item.$id"));
            }
            if !positions.insert(entry.data.position) {
                return Err(invalid("many entries cannot repeat the same data.position value"));
            }
        }

        let contiguous = positions
            .iter()
            .enumerate()
            .all(|(expected, &position)| position as usize == expected);
        if !contiguous {
            return Err(invalid("positions must be contiguous and start at 0"));
        }

        Ok(())
    }

    /// Item id -> position.
    pub fn positions(&self) -> BTreeMap<String, u32> {
        self.many
            .iter()
            .map(|entry| (entry.connectors.item.id.clone(), entry.data.position))
            .collect()
    }
}
