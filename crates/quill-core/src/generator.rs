//! The generation pipeline driver.
//!
//! Composes the stages end to end: invoke with retry → empty-reply check →
//! strict decode → completeness validation, with best-effort salvage when
//! decode fails. Decode and validation problems never abort the run; they
//! become partial [`Outcome`]s so downstream callers can route them for
//! human review.

use crate::config::Config;
use crate::document::parse_document;
use crate::llm::{
    invoke_with_retry, ClassifiedError, ErrorKind, GenerationRequest, InvokeOptions, TextProvider,
};
use crate::outcome::Outcome;
use crate::salvage::salvage;
use crate::validation::missing_sections;
use std::time::Duration;

/// Configuration for one generation pipeline.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Max retry attempts after the initial call
    pub max_retries: u32,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
    /// Optional wall-clock budget across all attempts and sleeps
    pub deadline_ms: Option<u64>,
    /// Maximum output tokens requested from the backend
    pub max_output_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout_ms: 60_000,
            base_delay_ms: 1000,
            deadline_ms: None,
            max_output_tokens: 8000,
        }
    }
}

impl GenerateOptions {
    /// Build options from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.retry.max_retries,
            timeout_ms: config.retry.timeout_ms,
            base_delay_ms: config.retry.base_delay_ms,
            deadline_ms: config.retry.deadline_ms,
            max_output_tokens: config.generation.max_output_tokens,
        }
    }
}

/// Single-call document generation pipeline.
///
/// Stateless between runs; hosts invoking several pipelines concurrently
/// construct one `Generator` per run.
pub struct Generator {
    provider: Box<dyn TextProvider>,
    options: GenerateOptions,
}

impl Generator {
    pub fn new(provider: Box<dyn TextProvider>, options: GenerateOptions) -> Self {
        Self { provider, options }
    }

    /// Run the pipeline once and classify the terminal state.
    ///
    /// Only true backend failures surface as [`Outcome::FatalBackend`];
    /// malformed or incomplete replies degrade to partial outcomes carrying
    /// whatever structured content could be recovered.
    pub async fn generate(&self, prompt: &str, expected_sections: &[String]) -> Outcome {
        tracing::info!(
            "Generating {} expected section(s) via {} ({} prompt chars)",
            expected_sections.len(),
            self.provider.name(),
            prompt.len()
        );

        let request = GenerationRequest::new(prompt, self.options.max_output_tokens);
        let invoke_options = InvokeOptions {
            max_retries: self.options.max_retries,
            timeout_ms: self.options.timeout_ms,
            base_delay_ms: self.options.base_delay_ms,
        };

        let invocation = invoke_with_retry(self.provider.as_ref(), &request, &invoke_options);
        let result = match self.options.deadline_ms {
            Some(deadline_ms) => {
                match tokio::time::timeout(Duration::from_millis(deadline_ms), invocation).await {
                    Ok(result) => result,
                    Err(_) => Err(ClassifiedError {
                        kind: ErrorKind::Timeout,
                        status_code: None,
                        message: format!("Deadline of {deadline_ms}ms exceeded across all attempts"),
                    }),
                }
            }
            None => invocation.await,
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                tracing::error!("Generation failed: {error}");
                return Outcome::FatalBackend { error };
            }
        };

        tracing::info!(
            "Received reply: {} characters from {}",
            response.text.len(),
            response.model
        );

        if response.text.trim().is_empty() {
            // Retrying won't fix an empty-but-successful reply pattern
            tracing::error!("Backend returned an empty reply");
            return Outcome::EmptyReply;
        }

        match parse_document(&response.text) {
            Ok(document) => {
                let missing = missing_sections(&document, expected_sections);
                if missing.is_empty() {
                    tracing::info!(
                        "All {} expected section(s) present and complete",
                        expected_sections.len()
                    );
                    Outcome::FullSuccess { document }
                } else {
                    tracing::warn!(
                        "Document incomplete: {} of {} section(s) missing",
                        missing.len(),
                        expected_sections.len()
                    );
                    Outcome::PartialDocument { document, missing }
                }
            }
            Err(decode_error) => {
                tracing::warn!("Strict decode failed ({decode_error}); attempting salvage");
                let salvaged = salvage(&response.text);
                if salvaged.sections.is_empty() {
                    tracing::warn!("Salvage recovered nothing; raw reply retained for review");
                } else {
                    tracing::info!("Salvage recovered {} section(s)", salvaged.sections.len());
                }
                Outcome::PartialSalvage { salvage: salvaged }
            }
        }
    }
}
