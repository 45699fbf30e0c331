//! Backend integration for text generation.
//!
//! Provides a provider abstraction over the supported backends (Anthropic,
//! OpenAI, Ollama) plus the retry machinery: failure classification,
//! exponential backoff, and the invocation loop.

pub(crate) mod anthropic;
pub(crate) mod backoff;
pub(crate) mod classify;
pub(crate) mod invoker;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use backoff::{backoff_delay, MAX_BACKOFF_MS};
pub use classify::{classify, ClassifiedError, ErrorKind};
pub use invoker::{invoke_with_retry, InvokeOptions};
pub use provider::{
    resolve_env_var, GenerationRequest, GenerationResponse, ProviderFactory, TextProvider,
};
