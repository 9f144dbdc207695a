// SPDX-License-Identifier: Apache-2.0

use crate::config::LlmConfig;
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("completion provider unavailable: {0}")]
    Unavailable(String),
    #[error("completion client build failed: {0}")]
    Client(String),
    #[error("completion request failed: {0}")]
    Http(String),
    #[error("completion request timed out")]
    Timeout,
    #[error("completion endpoint returned status {0}")]
    Status(u16),
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// A single-shot text completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct HttpCompletionProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl HttpCompletionProvider {
    pub fn new(cfg: &LlmConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;
        Ok(Self {
            client,
            api_key: cfg.api_key.clone(),
            api_url: cfg.api_url.clone(),
            model: cfg.model.clone(),
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "You are an advisor for Forest Rights Act beneficiaries. Reply with JSON only."},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.2
        })
    }
}

/// Extracts `choices[0].message.content` from a chat-completions reply.
pub(crate) fn completion_text(body: &Value) -> Result<String, ProviderError> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| ProviderError::Malformed("missing choices[0].message.content".to_string()))
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::Unavailable("no api key configured".to_string()));
        };
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Http(e.to_string())
                }
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::Malformed(e.to_string())
            }
        })?;
        completion_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reports_unavailable_without_network() {
        let provider = HttpCompletionProvider::new(&LlmConfig::default()).expect("client");
        let err = provider.complete("hello").await.expect_err("no key");
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[test]
    fn client_build_errors_are_reported() {
        assert!(HttpCompletionProvider::new(&LlmConfig {
            timeout: std::time::Duration::from_millis(1),
            ..LlmConfig::default()
        })
        .is_ok());
        let err = ProviderError::Client("tls backend".to_string());
        assert_eq!(err.to_string(), "completion client build failed: tls backend");
    }

    #[test]
    fn completion_text_reads_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        assert_eq!(completion_text(&body).expect("content"), "{}");
        assert!(matches!(
            completion_text(&json!({"choices": []})),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn request_body_carries_model_and_prompt() {
        let provider = HttpCompletionProvider::new(&LlmConfig {
            model: "test-model".to_string(),
            ..LlmConfig::default()
        })
        .expect("client");
        let body = provider.request_body("profile");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][1]["content"], "profile");
    }
}
