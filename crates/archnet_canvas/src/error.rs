// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for canvas documents.

/// Errors reading, parsing or writing canvas documents.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// Underlying filesystem failure.
    #[error("canvas io error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-empty content that is not a valid canvas document.
    #[error("malformed canvas document: {0}")]
    Malformed(#[from] serde_json::Error),
}
