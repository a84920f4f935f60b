// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout math for placing generated cards.

use serde::{Deserialize, Serialize};

/// A top-left position in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

/// Spacing and sizing configuration for generated cards.
///
/// Passed explicitly as a value; there are no layout globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal spacing unit between sibling cards.
    pub spacing: i64,
    /// Vertical drop from a parent card to its children.
    pub drop: i64,
    /// Width of generated text cards.
    pub child_width: i64,
    /// Height of generated text cards.
    pub child_height: i64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 500,
            drop: 500,
            child_width: 400,
            child_height: 250,
        }
    }
}

/// Horizontal offsets spreading `count` siblings symmetrically around zero.
///
/// Odd counts center one card on zero. Even counts leave the zero slot
/// empty, so two children sit a full spacing unit out on either side.
pub fn sibling_offsets(count: usize, spacing: i64) -> Vec<i64> {
    match count {
        0 => Vec::new(),
        1 => vec![0],
        n if n % 2 == 1 => {
            let mid = (n / 2) as i64;
            (0..n as i64).map(|i| (i - mid) * spacing).collect()
        }
        n => {
            let half = (n / 2) as i64;
            (-half..=half).filter(|i| *i != 0).map(|i| i * spacing).collect()
        }
    }
}

/// Positions for `count` children dropped below `anchor`.
///
/// Each offset is subtracted from the anchor's x coordinate; every child
/// lands `config.drop` pixels below the anchor.
pub fn child_positions(anchor: Point, count: usize, config: &LayoutConfig) -> Vec<Point> {
    sibling_offsets(count, config.spacing)
        .into_iter()
        .map(|offset| Point {
            x: anchor.x - offset,
            y: anchor.y + config.drop,
        })
        .collect()
}

/// Row-major grid of `count` top-left positions starting at `anchor`.
///
/// Cards are spaced by their size plus `margin` in both directions.
pub fn grid_positions(
    anchor: Point,
    count: usize,
    columns: usize,
    width: i64,
    height: i64,
    margin: i64,
) -> Vec<Point> {
    let columns = columns.max(1);
    (0..count)
        .map(|i| {
            let col = (i % columns) as i64;
            let row = (i / columns) as i64;
            Point {
                x: anchor.x + col * (width + margin),
                y: anchor.y + row * (height + margin),
            }
        })
        .collect()
}
