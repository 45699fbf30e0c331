//! Text-generation provider trait and request/response types.
//!
//! Defines the interface that all backends implement, plus the factory that
//! creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::{ConfigError, GenerationError};
use async_trait::async_trait;

/// A single generation request: one user prompt, one structured reply.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Assembled prompt text
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// The reply from one successful backend call.
///
/// `text` is returned verbatim, with no trimming or emptiness policy: the
/// pipeline driver owns the empty-reply rule so it lives in one place.
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw generated text
    pub text: String,
    /// Model identifier reported by the backend
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all generation backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn TextProvider>` for dynamic dispatch).
#[async_trait]
pub trait TextProvider: Send + Sync + std::fmt::Debug {
    /// Provider name for logging (e.g., "anthropic", "ollama").
    fn name(&self) -> &str;

    /// Run one generation call. No retries here; the invocation loop owns
    /// retry policy.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a backend provider based on provider name, config, and optional
    /// model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("anthropic", "openai", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn TextProvider>, ConfigError> {
        match provider {
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "Anthropic API key not set. Set ANTHROPIC_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key, &model,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::ValidationError(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &api_key, &model,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model.clone());
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                )))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown provider: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_new() {
        let request = GenerationRequest::new("write the sections", 8000);
        assert_eq!(request.prompt, "write the sections");
        assert_eq!(request.max_tokens, 8000);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = LlmConfig::default();
        let err = ProviderFactory::create("mystery", &config, None).unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn test_factory_creates_ollama_without_key() {
        // Ollama needs no API key, so creation always succeeds
        let config = LlmConfig::default();
        let provider = ProviderFactory::create("ollama", &config, None).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_model_override() {
        let config = LlmConfig::default();
        let provider = ProviderFactory::create("ollama", &config, Some("mistral")).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
