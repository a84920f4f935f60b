// SPDX-License-Identifier: MIT OR Apache-2.0
//! Local inference process binding.
//!
//! Drives a long-lived llama.cpp-style executable in interactive mode:
//! prompts are written to its stdin and output is read back until the
//! ready marker reappears or the stream stays silent for the idle window.
//! The output stream has no length prefix or protocol terminator, so
//! silence for the idle window is treated as end of response.

use crate::{CompletionEngine, EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use async_trait::async_trait;

/// Configuration for the locally spawned inference process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    /// Path to the inference executable.
    pub binary: PathBuf,
    /// Path to the model weights.
    pub model: PathBuf,
    /// RNG seed (-1 for random).
    pub seed: i64,
    /// Worker threads.
    pub threads: u32,
    /// Tokens to predict per prompt.
    pub n_predict: u32,
    /// Top-k sampling.
    pub top_k: u32,
    /// Top-p sampling.
    pub top_p: f32,
    /// Tokens considered by the repetition penalty.
    pub repeat_last_n: u32,
    /// Repetition penalty.
    pub repeat_penalty: f32,
    /// Context window size.
    pub ctx_size: u32,
    /// Sampling temperature.
    pub temp: f32,
    /// Batch size for prompt processing.
    pub batch_size: u32,
    /// Character that marks the process as ready for the next prompt.
    pub ready_marker: char,
    /// Silence window treated as end of response, in milliseconds.
    pub idle_timeout_ms: u64,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("llama"),
            model: PathBuf::from("models/7B/ggml-model-q4_0.bin"),
            seed: -1,
            threads: 4,
            n_predict: 128,
            top_k: 40,
            top_p: 0.9,
            repeat_last_n: 64,
            repeat_penalty: 1.1,
            ctx_size: 512,
            temp: 0.8,
            batch_size: 8,
            ready_marker: '>',
            idle_timeout_ms: 4000,
        }
    }
}

impl LocalEngineConfig {
    fn command_args(&self) -> Vec<String> {
        vec![
            "--seed".to_string(),
            self.seed.to_string(),
            "--threads".to_string(),
            self.threads.to_string(),
            "--n_predict".to_string(),
            self.n_predict.to_string(),
            "--top_k".to_string(),
            self.top_k.to_string(),
            "--top_p".to_string(),
            self.top_p.to_string(),
            "--repeat_last_n".to_string(),
            self.repeat_last_n.to_string(),
            "--repeat_penalty".to_string(),
            self.repeat_penalty.to_string(),
            "--ctx_size".to_string(),
            self.ctx_size.to_string(),
            "--temp".to_string(),
            self.temp.to_string(),
            "--batch_size".to_string(),
            self.batch_size.to_string(),
            "--model".to_string(),
            self.model.to_string_lossy().into_owned(),
        ]
    }
}

struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
}

/// Completion engine bound to a locally spawned inference process.
///
/// The process is spawned lazily on the first request and kept alive until
/// [`CompletionEngine::shutdown`] kills it. `kill_on_drop` is set as a
/// backstop for callers that never shut down cleanly.
pub struct LocalEngine {
    config: LocalEngineConfig,
    process: Mutex<Option<EngineProcess>>,
}

impl LocalEngine {
    /// Build an engine from its configuration without spawning anything.
    pub fn new(config: LocalEngineConfig) -> Self {
        Self {
            config,
            process: Mutex::new(None),
        }
    }

    fn spawn(&self) -> EngineResult<EngineProcess> {
        let mut child = Command::new(&self.config.binary)
            .args(self.config.command_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child.stdin.take().ok_or(EngineError::NotRunning)?;
        let stdout = child.stdout.take().ok_or(EngineError::NotRunning)?;
        tracing::info!(
            "spawned inference process {:?} (pid {:?})",
            self.config.binary,
            child.id()
        );
        Ok(EngineProcess {
            child,
            stdin,
            stdout,
        })
    }

    /// Read from `stdout` until the ready marker shows up or the stream is
    /// silent for the configured idle window.
    async fn read_response(&self, stdout: &mut ChildStdout) -> EngineResult<String> {
        let idle = Duration::from_millis(self.config.idle_timeout_ms);
        let marker = self.config.ready_marker;
        let mut collected: Vec<u8> = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            match tokio::time::timeout(idle, stdout.read(&mut chunk)).await {
                // Silence for the whole idle window: the response is over.
                Err(_) => break,
                Ok(Ok(0)) => break,
                Ok(Ok(read)) => {
                    collected.extend_from_slice(&chunk[..read]);
                    let text = String::from_utf8_lossy(&collected);
                    if text.trim_end().ends_with(marker) {
                        break;
                    }
                }
                Ok(Err(e)) => return Err(EngineError::Process(e)),
            }
        }

        let text = String::from_utf8_lossy(&collected);
        let text = text.trim_end();
        let text = text.strip_suffix(marker).unwrap_or(text);
        Ok(text.trim().to_owned())
    }
}

#[async_trait]
impl CompletionEngine for LocalEngine {
    async fn complete(&self, prompt: &str, n: usize) -> EngineResult<Vec<String>> {
        if n > 1 {
            tracing::debug!("local engine produces a single completion; ignoring n={n}");
        }

        let mut guard = self.process.lock().await;
        if guard.is_none() {
            *guard = Some(self.spawn()?);
        }
        let process = guard.as_mut().ok_or(EngineError::NotRunning)?;

        process.stdin.write_all(prompt.as_bytes()).await?;
        process.stdin.write_all(b"\n").await?;
        process.stdin.flush().await?;

        let text = self.read_response(&mut process.stdout).await?;
        Ok(vec![text])
    }

    async fn shutdown(&self) -> EngineResult<()> {
        if let Some(mut process) = self.process.lock().await.take() {
            tracing::info!("stopping inference process");
            process.child.kill().await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}
