// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ancestor-chain prompt reconstruction.
//!
//! Walks the edge list backward from a card toward the root it descends
//! from, collecting the texts along the way into a single generation prompt.

use crate::canvas::Canvas;
use crate::node::{Node, NodeId};
use std::collections::HashSet;

/// Collect the texts of `start`'s ancestors, most distant ancestor first,
/// joined by single spaces.
///
/// The walk repeatedly follows the first edge (in insertion order) whose
/// target is the current card. An edge whose source card does not exist ends
/// the walk as if the root had been reached, and a visited set guarantees
/// termination on cyclic documents. File cards carry no text; they
/// contribute nothing to the prompt but the walk continues through them.
///
/// A card with no incoming edge yields an empty string.
pub fn ancestor_prompt<'a>(canvas: &'a Canvas, start: &'a NodeId) -> String {
    let mut texts: Vec<&str> = Vec::new();
    let mut seen: HashSet<&NodeId> = HashSet::new();
    seen.insert(start);
    let mut current = start;

    loop {
        let Some(edge) = canvas.parent_edge(current) else {
            break;
        };
        let Some(parent) = canvas.node(&edge.from_node) else {
            // Dangling reference: treat as the root of the chain.
            break;
        };
        if !seen.insert(&parent.id) {
            // Cycle: the chain has led back to a card already walked.
            break;
        }
        if let Some(text) = parent.text_content() {
            texts.push(text);
        }
        current = &parent.id;
    }

    // Collected nearest-parent first; the prompt reads root first.
    texts.reverse();
    texts.join(" ")
}

/// The full prompt for a card: its ancestor chain followed by its own text.
pub fn node_prompt(canvas: &Canvas, node: &Node) -> String {
    let ancestors = ancestor_prompt(canvas, &node.id);
    let own = node.text_content().unwrap_or_default();
    if ancestors.is_empty() {
        own.to_owned()
    } else if own.is_empty() {
        ancestors
    } else {
        format!("{ancestors} {own}")
    }
}
