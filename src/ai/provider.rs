//! Completion provider client
//!
//! One outbound HTTP call per invocation against a Responses-style
//! completion endpoint. The base URL is configurable so tests can point
//! the client at a local mock server.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hosted completion API used when no base URL override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when neither `OPENAI_MODEL` nor `--model` is given.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Timeout applied to the shared HTTP client. Per-call deadlines are
/// deliberately not layered on top of this.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Failures of the outbound provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed completion payload: {0}")]
    Malformed(String),
}

/// Parameters for one generation call, already merged with the
/// deployment-wide defaults by the proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionCall {
    pub instructions: String,
    pub input: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

/// A text-completion backend: prompt + parameters in, generated text out.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, call: CompletionCall) -> Result<String, ProviderError>;
}

/// Connection settings for the hosted provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    /// Resolve settings from the environment:
    /// `OPENAI_BASE_URL`, `OPENAI_MODEL`, `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_key: env::var("OPENAI_API_KEY").ok(),
        }
    }
}

/// Provider client speaking the Responses-style JSON API:
/// `POST {base_url}/responses` with instructions, input and generation
/// parameters; the generated text comes back as an `output_text` part.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, config })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesPayload {
    fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .flat_map(|item| item.content.iter())
            .find(|part| part.kind == "output_text")
            .map(|part| part.text.as_str())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, call: CompletionCall) -> Result<String, ProviderError> {
        let url = format!("{}/responses", self.config.base_url);
        let body = ResponsesRequest {
            model: &self.config.model,
            instructions: &call.instructions,
            input: &call.input,
            temperature: call.temperature,
            max_output_tokens: call.max_output_tokens,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ResponsesPayload = response.json().await?;
        payload
            .output_text()
            .map(str::to_owned)
            .ok_or_else(|| ProviderError::Malformed("no output_text part in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn call() -> CompletionCall {
        CompletionCall {
            instructions: "Answer concisely.".to_string(),
            input: "Say hello".to_string(),
            temperature: 1.0,
            max_output_tokens: 100,
        }
    }

    fn provider_for(server: &mockito::Server) -> OpenAiProvider {
        OpenAiProvider::new(ProviderConfig {
            base_url: server.url(),
            model: "test-model".to_string(),
            api_key: None,
        })
        .unwrap()
    }

    const HELLO_PAYLOAD: &str = r#"{
        "id": "resp_1",
        "output": [
            {
                "type": "message",
                "content": [
                    {"type": "output_text", "text": "Hello"}
                ]
            }
        ]
    }"#;

    // ==================== Success Tests ====================

    #[tokio::test]
    async fn test_complete_extracts_output_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/responses")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(HELLO_PAYLOAD)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let text = provider.complete(call()).await.unwrap();

        assert_eq!(text, "Hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_forwards_generation_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/responses")
            .match_body(Matcher::PartialJson(json!({
                "model": "test-model",
                "input": "Say hello",
                "temperature": 0.5,
                "max_output_tokens": 42
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(HELLO_PAYLOAD)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let text = provider
            .complete(CompletionCall {
                temperature: 0.5,
                max_output_tokens: 42,
                ..call()
            })
            .await
            .unwrap();

        assert_eq!(text, "Hello");
        mock.assert_async().await;
    }

    // ==================== Failure Tests ====================

    #[tokio::test]
    async fn test_complete_maps_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/responses")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.complete(call()).await.unwrap_err();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_rejects_payload_without_output_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/responses")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"output": [{"type": "message", "content": []}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.complete(call()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_complete_rejects_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/responses")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.complete(call()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Http(_)));
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_config_default_points_at_hosted_api() {
        let config = ProviderConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.api_key.is_none());
    }
}
