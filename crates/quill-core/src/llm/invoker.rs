//! The invocation loop: repeated backend calls with classification and
//! backoff until success, fatal error, or attempt budget exhaustion.

use super::backoff::backoff_delay;
use super::classify::{classify, ClassifiedError, ErrorKind};
use super::provider::{GenerationRequest, GenerationResponse, TextProvider};
use crate::error::GenerationError;
use std::time::Duration;

/// Retry policy for one invocation.
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    /// Max retry attempts after the initial call (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Per-attempt timeout in milliseconds
    pub timeout_ms: u64,
    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout_ms: 60_000,
            base_delay_ms: 1000,
        }
    }
}

/// Drive repeated calls against `provider` until success, a non-retryable
/// error, or exhaustion of the attempt budget.
///
/// On exhaustion the *last* classified error is returned, not the first,
/// since later errors tend to carry more specific diagnostics. A non-retryable
/// error aborts immediately regardless of remaining budget. The backoff
/// sleep and the call itself are the only suspension points; wrapping the
/// returned future in `tokio::time::timeout` bounds total wall-clock time
/// across all attempts.
pub async fn invoke_with_retry(
    provider: &dyn TextProvider,
    request: &GenerationRequest,
    options: &InvokeOptions,
) -> Result<GenerationResponse, ClassifiedError> {
    let mut last_error: Option<ClassifiedError> = None;

    for attempt in 0..=options.max_retries {
        if attempt > 0 {
            let delay = backoff_delay(attempt - 1, options.base_delay_ms);
            tracing::debug!(
                "Retry {attempt}/{} against {} after {delay:?}",
                options.max_retries,
                provider.name()
            );
            tokio::time::sleep(delay).await;
        }

        tracing::debug!(
            "Backend call attempt {} of {}",
            attempt + 1,
            options.max_retries + 1
        );

        let result = tokio::time::timeout(
            Duration::from_millis(options.timeout_ms),
            provider.generate(request),
        )
        .await;

        match result {
            Ok(Ok(response)) => return Ok(response),
            Ok(Err(error)) => {
                let classified = classify(&error);
                tracing::warn!(
                    "Backend call failed ({}): {}",
                    classified.kind,
                    classified.message
                );
                if !classified.retryable() {
                    return Err(classified);
                }
                last_error = Some(classified);
            }
            Err(_) => {
                // Timeouts are retryable
                let classified = classify(&GenerationError::Timeout {
                    timeout_ms: options.timeout_ms,
                });
                tracing::warn!("Backend call timed out after {}ms", options.timeout_ms);
                last_error = Some(classified);
            }
        }
    }

    // The loop always runs at least once and every failing path records the
    // error, so the fallback below is unreachable in practice.
    Err(last_error.unwrap_or(ClassifiedError {
        kind: ErrorKind::Unknown,
        status_code: None,
        message: "retry loop made no attempts".to_string(),
    }))
}
