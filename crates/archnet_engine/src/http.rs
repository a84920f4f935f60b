// SPDX-License-Identifier: MIT OR Apache-2.0
//! Remote HTTP completion binding.

use crate::{CompletionEngine, EngineError, EngineResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the HTTP completion binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEngineConfig {
    /// Completion endpoint URL.
    pub url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Maximum tokens to generate per completion.
    pub max_tokens: u32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    /// Frequency penalty.
    pub frequency_penalty: f32,
    /// Presence penalty.
    pub presence_penalty: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional bearer token for the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for HttpEngineConfig {
    fn default() -> Self {
        Self {
            url: "https://api.openai.com/v1/completions".to_string(),
            model: "text-davinci-003".to_string(),
            max_tokens: 100,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Completion engine bound to a remote HTTP API.
pub struct HttpEngine {
    config: HttpEngineConfig,
    client: Client,
}

impl HttpEngine {
    /// Build an engine from its configuration.
    pub fn new(config: HttpEngineConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl CompletionEngine for HttpEngine {
    async fn complete(&self, prompt: &str, n: usize) -> EngineResult<Vec<String>> {
        let body = CompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: self.config.max_tokens,
            top_p: self.config.top_p,
            frequency_penalty: self.config.frequency_penalty,
            presence_penalty: self.config.presence_penalty,
            n: n.max(1) as u32,
        };

        let mut request = self.client.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        if parsed.choices.is_empty() {
            return Err(EngineError::Empty);
        }

        tracing::debug!(
            "received {} completion(s) from {}",
            parsed.choices.len(),
            self.config.url
        );
        Ok(parsed.choices.into_iter().map(|c| c.text).collect())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_field_names() {
        let body = CompletionRequest {
            model: "test-model",
            prompt: "a b c",
            max_tokens: 100,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            n: 2,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "test-model",
                "prompt": "a b c",
                "max_tokens": 100,
                "top_p": 1.0,
                "frequency_penalty": 0.0,
                "presence_penalty": 0.0,
                "n": 2,
            })
        );
    }

    #[test]
    fn test_response_parses_choice_texts() {
        let raw = r#"{"id":"cmpl-1","choices":[{"text":"one","index":0},{"text":"two","index":1}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        let texts: Vec<String> = parsed.choices.into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }
}
