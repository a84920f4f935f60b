// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas document model for Archnet.
//!
//! A canvas is a persisted graph of positioned cards (`nodes`) and directed,
//! anchored connections (`edges`), stored as a UTF-8 JSON document. This
//! crate provides:
//! - The document model and its wire format
//! - The ancestor-chain walk that reconstructs a generation prompt
//! - Layout math for placing newly generated cards
//! - The document store boundary (whole-document read/write)
//!
//! ## Architecture
//!
//! Everything here is deterministic and host-free: I/O happens only behind
//! the [`store::CanvasStore`] trait, so the graph walk and layout math can
//! be tested without any environment.

pub mod ancestry;
pub mod canvas;
pub mod edge;
pub mod error;
pub mod layout;
pub mod node;
pub mod store;

pub use canvas::Canvas;
pub use edge::{Edge, EdgeId, Side};
pub use error::CanvasError;
pub use layout::{LayoutConfig, Point};
pub use node::{Node, NodeContent, NodeId};
pub use store::{CanvasStore, DocumentLocks, FsCanvasStore};
