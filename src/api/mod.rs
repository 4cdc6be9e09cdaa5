//! HTTP plumbing for the hosted entity store.
//!
//! The store is a backend-as-a-service exposing entity CRUD under
//! `/entities/{Kind}` and serverless functions under `/functions/{name}`.
//! This module owns the request/retry mechanics; `entities` and `functions`
//! own the payload shapes.
//!
//! Dashboard reads default to `RetryPolicy::none()` — a failed widget fetch
//! renders an empty state instead of spawning a retry storm.

pub mod entities;
pub mod functions;

use std::time::Duration;

use crate::error::FetchError;

pub use entities::{EntityQuery, EntityStore, HttpEntityStore};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl RetryPolicy {
    /// Single attempt, no backoff. The default for widget reads.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryDecision {
    Retryable,
    NonRetryable,
}

fn retry_decision_for_status(status: reqwest::StatusCode) -> RetryDecision {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        RetryDecision::Retryable
    } else {
        RetryDecision::NonRetryable
    }
}

fn retry_delay(
    attempt: u32,
    policy: &RetryPolicy,
    retry_after: Option<&reqwest::header::HeaderValue>,
) -> Duration {
    if let Some(value) = retry_after.and_then(|v| v.to_str().ok()) {
        if let Ok(secs) = value.parse::<u64>() {
            return Duration::from_secs(secs.min(30));
        }
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    let jitter = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0))
        % 150;
    Duration::from_millis(base.saturating_add(jitter))
}

/// Send a request, retrying transient failures per `policy`.
///
/// Honors Retry-After on 429/5xx. Transport errors retry only when they are
/// timeouts or connect failures. With `RetryPolicy::none()` this is a plain
/// send.
pub async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, FetchError> {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        let Some(cloned) = request.try_clone() else {
            return request.send().await.map_err(FetchError::Http);
        };

        match cloned.send().await {
            Ok(response) => {
                let status = response.status();
                let decision = retry_decision_for_status(status);
                if decision == RetryDecision::Retryable && attempt < attempts {
                    let delay = retry_delay(
                        attempt,
                        policy,
                        response.headers().get(reqwest::header::RETRY_AFTER),
                    );
                    log::warn!(
                        "entity store retry {}/{} after status {} (sleep {:?})",
                        attempt,
                        attempts,
                        status,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Ok(response);
            }
            Err(err) => {
                let retryable_transport = err.is_timeout() || err.is_connect();
                if retryable_transport && attempt < attempts {
                    let delay = retry_delay(attempt, policy, None);
                    log::warn!(
                        "entity store retry {}/{} after transport error: {} (sleep {:?})",
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(FetchError::Http(err));
            }
        }
    }

    Err(FetchError::Configuration(
        "request exhausted retries".to_string(),
    ))
}

/// Read an error body into a `FetchError::Status`, bounded to keep logs sane.
pub(crate) async fn status_error(response: reqwest::Response) -> FetchError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(512).collect();
    FetchError::Status { status, message }
}
