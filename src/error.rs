//! Error types for entity-store access.
//!
//! Errors are classified by recoverability:
//! - Retryable: network issues, timeouts, rate limits
//! - NonRetryable: bad requests, decode failures, configuration errors
//!
//! Nothing above the fetch layer propagates these: widgets degrade to their
//! empty state and keep the dashboard rendering (see `crate::widgets`).

use thiserror::Error;

/// Error from a single entity-store or function call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode store payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FetchError {
    /// Returns true if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Http(e) => e.is_timeout() || e.is_connect(),
            FetchError::Status { status, .. } => {
                *status == 429 || *status == 408 || *status >= 500
            }
            FetchError::Timeout(_) => true,
            FetchError::Decode(_) | FetchError::Configuration(_) => false,
        }
    }
}

/// Serializable error representation for diagnostics payloads.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDiagnostic {
    pub message: String,
    pub can_retry: bool,
}

impl From<&FetchError> for FetchDiagnostic {
    fn from(err: &FetchError) -> Self {
        FetchDiagnostic {
            message: err.to_string(),
            can_retry: err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryable_classification() {
        let rate_limited = FetchError::Status {
            status: 429,
            message: "slow down".to_string(),
        };
        assert!(rate_limited.is_retryable());

        let server = FetchError::Status {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server.is_retryable());

        let bad_request = FetchError::Status {
            status: 400,
            message: "bad filter".to_string(),
        };
        assert!(!bad_request.is_retryable());
    }

    #[test]
    fn test_decode_not_retryable() {
        let err = FetchError::Decode(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_diagnostic_carries_classification() {
        let err = FetchError::Timeout(30);
        let diag = FetchDiagnostic::from(&err);
        assert!(diag.can_retry);
        assert!(diag.message.contains("30"));
    }
}
