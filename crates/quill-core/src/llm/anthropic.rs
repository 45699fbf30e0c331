//! Anthropic backend using the Messages API.
//!
//! Sends the prompt as a single user message and joins the text content
//! blocks of the reply. Error bodies are decoded so the classifier sees the
//! wire-level error type (`rate_limit_error`, `overloaded_error`, ...)
//! alongside the HTTP status.

use super::provider::{GenerationRequest, GenerationResponse, TextProvider};
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Anthropic provider using the Messages API.
#[derive(Debug)]
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    model: String,
    usage: Usage,
}

#[derive(Deserialize)]
struct ResponseContent {
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

// --- Error body ---

/// Anthropic error envelope: `{"type":"error","error":{"type","message"}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

#[async_trait]
impl TextProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let start = Instant::now();

        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        };

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Backend {
                message: format!("Anthropic request failed: {e}"),
                status_code: None,
                error_type: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            // Keep the wire error type when the body is a structured envelope
            let (message, error_type) = match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => (
                    format!("Anthropic HTTP {status}: {}", envelope.error.message),
                    Some(envelope.error.error_type),
                ),
                Err(_) => (format!("Anthropic HTTP {status}: {text}"), None),
            };
            return Err(GenerationError::Backend {
                message,
                status_code: Some(status.as_u16()),
                error_type,
            });
        }

        let messages_resp: MessagesResponse =
            resp.json().await.map_err(|e| GenerationError::Backend {
                message: format!("Failed to parse Anthropic response: {e}"),
                status_code: None,
                error_type: None,
            })?;

        let text = messages_resp
            .content
            .into_iter()
            .filter_map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(GenerationResponse {
            text,
            model: messages_resp.model,
            tokens_used: Some(messages_resp.usage.input_tokens + messages_resp.usage.output_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_decodes_wire_type() {
        let body = r#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.error_type, "rate_limit_error");
        assert_eq!(envelope.error.message, "slow down");
    }

    #[test]
    fn test_request_body_shape() {
        let body = MessagesRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 8000,
            messages: vec![Message {
                role: "user".to_string(),
                content: "prompt".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "claude-sonnet-4-20250514");
        assert_eq!(json["max_tokens"], 8000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt");
    }
}
