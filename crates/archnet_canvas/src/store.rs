// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document store boundary.
//!
//! Canvas documents live in external storage and are read and written as a
//! unit; there is no incremental or streaming update.

use crate::canvas::Canvas;
use crate::error::CanvasError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Whole-document read/write access.
pub trait CanvasStore: Send + Sync {
    /// Read the document at `path`.
    ///
    /// A missing or empty file is an empty canvas, never an error.
    fn read(&self, path: &Path) -> Result<Canvas, CanvasError>;

    /// Serialize and write the document at `path`, replacing its contents.
    fn write(&self, path: &Path, canvas: &Canvas) -> Result<(), CanvasError>;
}

/// Filesystem-backed document store.
#[derive(Debug, Default)]
pub struct FsCanvasStore;

impl FsCanvasStore {
    /// Create a new filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl CanvasStore for FsCanvasStore {
    fn read(&self, path: &Path) -> Result<Canvas, CanvasError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(CanvasError::Io(e)),
        };
        let canvas = Canvas::from_json(&raw)?;
        tracing::debug!(
            "read canvas {:?}: {} cards, {} connections",
            path,
            canvas.node_count(),
            canvas.edge_count()
        );
        Ok(canvas)
    }

    fn write(&self, path: &Path, canvas: &Canvas) -> Result<(), CanvasError> {
        let raw = canvas.to_json()?;
        std::fs::write(path, raw)?;
        tracing::debug!(
            "wrote canvas {:?}: {} cards, {} connections",
            path,
            canvas.node_count(),
            canvas.edge_count()
        );
        Ok(())
    }
}

/// Per-document locks.
///
/// A command invocation holds its document's lock across the whole
/// read→modify→write cycle, so two invocations against the same document
/// cannot interleave and lose each other's writes.
#[derive(Debug, Default)]
pub struct DocumentLocks {
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl DocumentLocks {
    /// Create an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding the document at `path`.
    pub fn for_path(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}
