//! Exponential backoff scheduling for retry attempts.

use std::time::Duration;

/// Upper bound on a single backoff sleep.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Calculate the backoff duration before retry attempt `attempt` (0-based,
/// counting retries, not the initial call).
///
/// Uses `base_delay_ms * 2^attempt` with a cap at [`MAX_BACKOFF_MS`].
/// Deterministic, no jitter; callers fanning out concurrently must add
/// their own.
pub fn backoff_delay(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(MAX_BACKOFF_MS))
}
