// SPDX-License-Identifier: MIT OR Apache-2.0
//! Card definitions for canvas documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a card.
///
/// Documents written by other tools carry arbitrary alphanumeric ids, so the
/// id is an opaque string. [`NodeId::fresh`] mints a collision-resistant one;
/// uniqueness within the document is the only contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Mint a new random card id.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Card content, discriminated by the `type` field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeContent {
    /// A card holding literal text.
    Text {
        /// The card's text.
        text: String,
    },
    /// A card referencing a file.
    File {
        /// Path of the referenced file.
        file: String,
    },
}

/// A positioned content card in a canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id within the document.
    pub id: NodeId,
    /// Top-left x position in pixels.
    pub x: i64,
    /// Top-left y position in pixels.
    pub y: i64,
    /// Card width in pixels.
    pub width: i64,
    /// Card height in pixels.
    pub height: i64,
    /// Content variant.
    #[serde(flatten)]
    pub content: NodeContent,
    /// Optional display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Node {
    /// Create a text card with a fresh id.
    pub fn text(x: i64, y: i64, width: i64, height: i64, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            x,
            y,
            width,
            height,
            content: NodeContent::Text { text: text.into() },
            color: None,
        }
    }

    /// Create a file card with a fresh id.
    pub fn file(x: i64, y: i64, width: i64, height: i64, file: impl Into<String>) -> Self {
        Self {
            id: NodeId::fresh(),
            x,
            y,
            width,
            height,
            content: NodeContent::File { file: file.into() },
            color: None,
        }
    }

    /// The card's literal text, if it is a text card.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text { text } => Some(text),
            NodeContent::File { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_text_card_wire_format() {
        let mut node = Node::text(10, -20, 400, 250, "hello");
        node.id = NodeId::from("abc123");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc123",
                "x": 10,
                "y": -20,
                "width": 400,
                "height": 250,
                "type": "text",
                "text": "hello",
            })
        );
    }

    #[test]
    fn test_file_card_round_trip() {
        let raw = r#"{"id":"n1","x":0,"y":0,"width":400,"height":500,"type":"file","file":"notes/a.md","color":"4"}"#;
        let node: Node = serde_json::from_str(raw).unwrap();
        assert_eq!(node.content, NodeContent::File { file: "notes/a.md".to_owned() });
        assert_eq!(node.color.as_deref(), Some("4"));
        assert!(node.text_content().is_none());
        let back: Node = serde_json::from_str(&serde_json::to_string(&node).unwrap()).unwrap();
        assert_eq!(back, node);
    }
}
