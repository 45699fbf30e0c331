//! Failure classification for backend errors.
//!
//! Turns a raw [`GenerationError`] into a [`ClassifiedError`] whose kind
//! decides retryability. Pure function of its input; the invocation loop
//! consults it on every failed attempt.

use crate::error::GenerationError;
use std::fmt;
use thiserror::Error;

/// What went wrong, as far as retry policy is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// API rate limit exceeded (429 or `rate_limit_error`)
    RateLimited,
    /// Service temporarily overloaded (`overloaded_error`)
    Overloaded,
    /// Request or connection timeout
    Timeout,
    /// Server-side failure (5xx)
    ServerError,
    /// Authentication/authorization failure (401, 403)
    AuthError,
    /// Malformed request (400, `invalid_request_error`)
    BadRequest,
    /// Content policy violation
    ContentPolicy,
    /// Anything unrecognized
    Unknown,
}

impl ErrorKind {
    /// Whether errors of this kind are worth retrying.
    ///
    /// Retryability is a pure function of the kind: transient conditions
    /// (rate limit, overload, timeout, server error) retry; everything else
    /// fails immediately.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimited | ErrorKind::Overloaded | ErrorKind::Timeout | ErrorKind::ServerError
        )
    }

    /// Stable string form used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::Overloaded => "overloaded",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ServerError => "server-error",
            ErrorKind::AuthError => "auth-error",
            ErrorKind::BadRequest => "bad-request",
            ErrorKind::ContentPolicy => "content-policy",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend failure tagged with its retry classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ClassifiedError {
    /// Classified failure kind
    pub kind: ErrorKind,
    /// HTTP status, when the failure carried one
    pub status_code: Option<u16>,
    /// Original human-readable message, preserved verbatim
    pub message: String,
}

impl ClassifiedError {
    /// Whether this error is worth retrying. Delegates to the kind.
    pub fn retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Classify a backend failure.
///
/// Priority order: rate limit (explicit type or 429), then any 5xx status
/// (status wins over a conflicting wire type), then overload, then timeout,
/// then the non-retryable kinds. Total and deterministic.
pub fn classify(error: &GenerationError) -> ClassifiedError {
    match error {
        GenerationError::Timeout { .. } => ClassifiedError {
            kind: ErrorKind::Timeout,
            status_code: None,
            message: error.to_string(),
        },
        GenerationError::Backend {
            message,
            status_code,
            error_type,
        } => {
            let status = *status_code;
            let wire_type = error_type.as_deref().unwrap_or("");

            let kind = if wire_type == "rate_limit_error" || status == Some(429) {
                ErrorKind::RateLimited
            } else if status.is_some_and(|s| (500..=599).contains(&s)) {
                ErrorKind::ServerError
            } else if wire_type == "overloaded_error" {
                ErrorKind::Overloaded
            } else if wire_type.contains("timeout") {
                ErrorKind::Timeout
            } else if matches!(status, Some(401) | Some(403)) {
                ErrorKind::AuthError
            } else if status == Some(400) || wire_type == "invalid_request_error" {
                ErrorKind::BadRequest
            } else if wire_type.contains("content") || wire_type.contains("policy") {
                ErrorKind::ContentPolicy
            } else {
                ErrorKind::Unknown
            };

            ClassifiedError {
                kind,
                status_code: status,
                message: message.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(
        message: &str,
        status_code: Option<u16>,
        error_type: Option<&str>,
    ) -> GenerationError {
        GenerationError::Backend {
            message: message.to_string(),
            status_code,
            error_type: error_type.map(String::from),
        }
    }

    #[test]
    fn test_rate_limit_type_is_retryable() {
        let c = classify(&backend("slow down", None, Some("rate_limit_error")));
        assert_eq!(c.kind, ErrorKind::RateLimited);
        assert!(c.retryable());
    }

    #[test]
    fn test_status_429_is_rate_limited() {
        let c = classify(&backend("HTTP 429", Some(429), None));
        assert_eq!(c.kind, ErrorKind::RateLimited);
        assert!(c.retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 502, 503, 599] {
            let c = classify(&backend("boom", Some(status), None));
            assert_eq!(c.kind, ErrorKind::ServerError, "status {status}");
            assert!(c.retryable());
        }
    }

    #[test]
    fn test_5xx_status_wins_over_nonretryable_type() {
        // A 503 flagged with an unrecognized wire type still classifies by
        // status: server-error, retryable.
        let c = classify(&backend("flaky", Some(503), Some("api_error")));
        assert_eq!(c.kind, ErrorKind::ServerError);
        assert!(c.retryable());
    }

    #[test]
    fn test_overloaded_is_retryable() {
        let c = classify(&backend("busy", None, Some("overloaded_error")));
        assert_eq!(c.kind, ErrorKind::Overloaded);
        assert!(c.retryable());
    }

    #[test]
    fn test_timeout_type_substring_is_retryable() {
        let c = classify(&backend("gave up", None, Some("request_timeout_error")));
        assert_eq!(c.kind, ErrorKind::Timeout);
        assert!(c.retryable());
    }

    #[test]
    fn test_timeout_variant_is_retryable() {
        let c = classify(&GenerationError::Timeout { timeout_ms: 60_000 });
        assert_eq!(c.kind, ErrorKind::Timeout);
        assert!(c.retryable());
        assert!(c.message.contains("60000ms"));
    }

    #[test]
    fn test_auth_errors_not_retryable() {
        for status in [401, 403] {
            let c = classify(&backend("unauthorized", Some(status), None));
            assert_eq!(c.kind, ErrorKind::AuthError, "status {status}");
            assert!(!c.retryable());
        }
    }

    #[test]
    fn test_bad_request_not_retryable() {
        let c = classify(&backend("bad body", Some(400), None));
        assert_eq!(c.kind, ErrorKind::BadRequest);
        assert!(!c.retryable());

        let c = classify(&backend("bad body", None, Some("invalid_request_error")));
        assert_eq!(c.kind, ErrorKind::BadRequest);
        assert!(!c.retryable());
    }

    #[test]
    fn test_content_policy_not_retryable() {
        let c = classify(&backend("refused", None, Some("content_policy_violation")));
        assert_eq!(c.kind, ErrorKind::ContentPolicy);
        assert!(!c.retryable());
    }

    #[test]
    fn test_unknown_preserves_message() {
        let c = classify(&backend("something odd happened", None, None));
        assert_eq!(c.kind, ErrorKind::Unknown);
        assert!(!c.retryable());
        assert_eq!(c.message, "something odd happened");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let err = backend("slow down", Some(429), Some("rate_limit_error"));
        let first = classify(&err);
        let second = classify(&err);
        assert_eq!(first, second);
    }
}
