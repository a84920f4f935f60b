// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for completion engines.

/// Errors from completion engine bindings.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// HTTP transport failure.
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the completion API.
    #[error("completion API returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The API answered without any completion choices.
    #[error("completion API returned no choices")]
    Empty,

    /// Failed to spawn or drive the inference process.
    #[error("inference process io error: {0}")]
    Process(#[from] std::io::Error),

    /// The inference process is not running.
    #[error("inference process is not running")]
    NotRunning,
}
