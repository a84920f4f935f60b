// SPDX-License-Identifier: MIT OR Apache-2.0
//! Completion engine bindings for Archnet.
//!
//! A completion engine is an external collaborator with one capability:
//! given a prompt, return one or more completion texts. Two bindings exist:
//! - [`http::HttpEngine`] — a remote text-completion HTTP API
//! - [`local::LocalEngine`] — a locally spawned, long-lived inference process
//!
//! Both are reached through the [`CompletionEngine`] trait so the command
//! layer stays independent of the binding in use.

pub mod error;
pub mod http;
pub mod local;

pub use error::EngineError;
pub use http::{HttpEngine, HttpEngineConfig};
pub use local::{LocalEngine, LocalEngineConfig};

use async_trait::async_trait;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// A text-completion collaborator.
#[async_trait]
pub trait CompletionEngine: Send + Sync {
    /// Generate up to `n` completions for `prompt`.
    async fn complete(&self, prompt: &str, n: usize) -> EngineResult<Vec<String>>;

    /// Release any resources held by the engine.
    ///
    /// Long-lived bindings override this to terminate their process; the
    /// default is a no-op.
    async fn shutdown(&self) -> EngineResult<()> {
        Ok(())
    }

    /// Name of this binding, for logs.
    fn name(&self) -> &str;
}
