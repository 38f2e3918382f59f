//! Clova Studio chat-completion client
//!
//! Calls the HyperCLOVA X endpoints that generate practice content and
//! coaching sentences. The service layer only sees the [`ChatModel`]
//! trait, so tests run against a mock instead of the network.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;
use tracing::{debug, warn};

use crate::config::ClovaConfig;
use crate::llm::ChatMessage;

/// A chat-completion backend
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// One-shot generation (practice content, feedback sentences)
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Conversational completion for free chat practice
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        // Default: backends without a separate chat tier reuse complete()
        self.complete(messages).await
    }
}

/// Clova Studio API response envelope
#[derive(Debug, Deserialize)]
struct ClovaResponse {
    result: ClovaResult,
}

#[derive(Debug, Deserialize)]
struct ClovaResult {
    message: ClovaResultMessage,
}

#[derive(Debug, Deserialize)]
struct ClovaResultMessage {
    content: String,
}

/// Clova Studio client
#[derive(Clone)]
pub struct ClovaClient {
    config: ClovaConfig,
    client: reqwest::Client,
}

impl ClovaClient {
    pub fn new(config: ClovaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Health check - verify the API is reachable with our key
    pub async fn health_check(&self) -> bool {
        let url = format!(
            "{}/v3/chat-completions/{}",
            self.config.base_url, self.config.completion_model
        );
        match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "messages": [{"role": "user", "content": "ping"}],
                "maxTokens": 1
            }))
            .timeout(std::time::Duration::from_secs(2))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn request(&self, url: &str, payload: serde_json::Value) -> Result<String> {
        // Transient network errors get two retries with jittered backoff
        let strategy = ExponentialBackoff::from_millis(250).map(jitter).take(2);

        let response = Retry::spawn(strategy, || async {
            self.client
                .post(url)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
                .send()
                .await
        })
        .await
        .context("Clova Studio request failed")?;

        let status = response.status();
        let body_text = response.text().await.context("Clova Studio body read failed")?;

        if !status.is_success() {
            warn!("Clova Studio API error ({}): {}", status, body_text);
            anyhow::bail!("Clova Studio returned {status}");
        }

        debug!("🧠 Clova raw body: {}", body_text);

        let parsed: ClovaResponse = serde_json::from_str(&body_text)
            .with_context(|| format!("unexpected Clova Studio response: {body_text}"))?;
        Ok(parsed.result.message.content)
    }
}

#[async_trait]
impl ChatModel for ClovaClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/v3/chat-completions/{}",
            self.config.base_url, self.config.completion_model
        );
        let payload = serde_json::json!({
            "messages": messages,
            "topP": 0.8,
            "topK": 0,
            "temperature": 0.8,
            "maxTokens": 100,
            "repeatPenalty": 1.1,
            "stopBefore": [],
            "seed": 0,
            "includeTokens": false
        });
        self.request(&url, payload).await
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/v1/chat-completions/{}",
            self.config.base_url, self.config.chat_model
        );
        let payload = serde_json::json!({
            "messages": messages,
            "topP": 0.8,
            "topK": 0,
            "temperature": 0.8,
            "maxTokens": 100,
            "repeatPenalty": 5.0,
            "stopBefore": [],
            "includeTokens": false
        });
        self.request(&url, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_envelope_parses() {
        let body = r#"{"status": {"code": "20000"}, "result": {"message": {"role": "assistant", "content": "버스"}, "stopReason": "stop"}}"#;
        let parsed: ClovaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.message.content, "버스");
    }
}
