//! Quill Core - Resilient single-call document generation.
//!
//! Quill drives one call against a text-generation backend and turns the
//! reply into a structured multi-section document, degrading gracefully
//! when the backend misbehaves: transient failures retry with exponential
//! backoff, malformed replies go through best-effort salvage, and
//! incomplete documents are reported rather than discarded.
//!
//! # Architecture
//!
//! ```text
//! Prompt → Invoke (classify + backoff) → Decode → Validate → Outcome
//!                                           │
//!                                           └─ (decode fails) → Salvage ─┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use quill_core::{Config, GenerateOptions, Generator, ProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> quill_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = ProviderFactory::create("anthropic", &config.llm, None)?;
//!     let generator = Generator::new(provider, GenerateOptions::from_config(&config));
//!
//!     let expected = vec!["1-1".to_string(), "1-2".to_string()];
//!     let outcome = generator.generate("write the sections", &expected).await;
//!     println!("success: {}", outcome.signals(None).success);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod artifact;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod llm;
pub mod outcome;
pub mod salvage;
pub mod validation;

// Re-exports for convenient access
pub use artifact::{write_artifact, write_json_atomic};
pub use config::Config;
pub use document::{parse_document, Document, Section};
pub use error::{ConfigError, DecodeError, GenerationError, QuillError, Result};
pub use generator::{GenerateOptions, Generator};
pub use llm::{
    backoff_delay, classify, invoke_with_retry, ClassifiedError, ErrorKind, GenerationRequest,
    GenerationResponse, InvokeOptions, ProviderFactory, TextProvider,
};
pub use outcome::{ArtifactBody, ExitIntention, Outcome, Signals};
pub use salvage::{salvage, SalvageDiagnostic, SalvageResult};
pub use validation::missing_sections;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
