//! Ollama backend for local model inference.
//!
//! Talks to a local Ollama instance via its HTTP API.
//! No authentication required — just needs Ollama running locally.

use super::provider::{GenerationRequest, GenerationResponse, TextProvider};
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Ollama provider for local model inference.
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    num_predict: u32,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl TextProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();

        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            stream: false,
            options: OllamaOptions {
                num_predict: request.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Backend {
                message: format!("Ollama request failed: {e}"),
                status_code: None,
                error_type: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Backend {
                message: format!("Ollama HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
                error_type: None,
            });
        }

        let ollama_resp: OllamaResponse =
            resp.json().await.map_err(|e| GenerationError::Backend {
                message: format!("Failed to parse Ollama response: {e}"),
                status_code: None,
                error_type: None,
            })?;

        Ok(GenerationResponse {
            text: ollama_resp.response,
            model: self.model.clone(),
            tokens_used: None, // Ollama doesn't report token counts in generate endpoint
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
