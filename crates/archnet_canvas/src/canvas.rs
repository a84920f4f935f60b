// SPDX-License-Identifier: MIT OR Apache-2.0
//! The canvas document: a persisted graph of cards and connections.

use crate::edge::Edge;
use crate::error::CanvasError;
use crate::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// A canvas document.
///
/// Documents are read whole, grown in memory and written back whole; one
/// command cycle treats read→mutate→write as a unit. Growth is append-only:
/// existing cards and connections are never removed or edited in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Cards, in document order.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Connections, in insertion order.
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Canvas {
    /// Parse a document from its JSON text.
    ///
    /// Blank content is an empty canvas, never an error. Anything else that
    /// fails to parse is a fatal [`CanvasError::Malformed`].
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize the document to JSON text.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Get a card by id.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// The first edge (in insertion order) pointing at `id`, i.e. the edge
    /// from the card's parent. When several edges target the same card the
    /// earliest one wins.
    pub fn parent_edge(&self, id: &NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.to_node == *id)
    }

    /// Whether a card with `id` exists in the document.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append new cards and connections to the document.
    pub fn append(
        &mut self,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) {
        self.nodes.extend(nodes);
        self.edges.extend(edges);
    }

    /// Number of cards.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of connections.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
