// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for canvas documents.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Mint a new random edge id.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Anchor side of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Top edge of the card.
    Top,
    /// Bottom edge of the card.
    Bottom,
    /// Left edge of the card.
    Left,
    /// Right edge of the card.
    Right,
}

/// A directed, anchored connection between two cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique id within the document.
    pub id: EdgeId,
    /// Source (parent) card id.
    pub from_node: NodeId,
    /// Anchor side on the source card.
    pub from_side: Side,
    /// Target (child) card id.
    pub to_node: NodeId,
    /// Anchor side on the target card.
    pub to_side: Side,
    /// Optional display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Edge {
    /// Connect a parent card to a child placed below it.
    ///
    /// Generated connections always leave the parent's bottom edge and enter
    /// the child's top edge.
    pub fn connect(from_node: NodeId, to_node: NodeId) -> Self {
        Self {
            id: EdgeId::fresh(),
            from_node,
            from_side: Side::Bottom,
            to_node,
            to_side: Side::Top,
            color: None,
        }
    }

    /// Check if this edge involves a specific card.
    pub fn involves_node(&self, id: &NodeId) -> bool {
        self.from_node == *id || self.to_node == *id
    }
}
