//! Retry with exponential backoff for catalog requests.

use std::{future::Future, time::Duration};

use reqwest::{RequestBuilder, Response, StatusCode};
use tracing::warn;

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (zero based): base, 2×base, 4×base…
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Runs `op` until it succeeds or the policy's attempts are used up, sleeping
/// between attempts. The last error is returned; earlier ones are only logged.
pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, context: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt + 1 >= attempts => {
                warn!("{}: giving up after {} attempt(s): {}", context, attempts, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    "{}: attempt {} failed ({}), retrying in {:?}",
                    context,
                    attempt + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Sends once. A 404 is handed back as a response so the caller can decide
/// what "missing" means; every other non-success status is an error.
pub async fn send_once(service: &'static str, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| SyncError::external(service, e.to_string()))?;
    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_FOUND {
        Ok(response)
    } else {
        Err(SyncError::external(service, format!("HTTP {}", status)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn delay_should_double_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn two_failures_then_success_should_work() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = with_backoff(&fast_policy(), "flaky", |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(SyncError::external("leetcode", "connection reset"))
                } else {
                    Ok("payload")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_should_return_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result: Result<()> = with_backoff(&fast_policy(), "down", |attempt| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Err(SyncError::external("leetcode", format!("HTTP 50{}", attempt))) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "leetcode: HTTP 502");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_should_still_try_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            base_delay: Duration::from_millis(1),
        };
        let result = with_backoff(&policy, "once", |_| async { Ok::<_, SyncError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn not_found_should_not_be_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/missing", server.url());
        let response = with_backoff(&fast_policy(), "probe", |_| {
            send_once("leetcode", client.get(&url))
        })
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_errors_should_be_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/busy")
            .with_status(503)
            .expect(3)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/busy", server.url());
        let err = with_backoff(&fast_policy(), "busy", |_| {
            send_once("leetcode", client.get(&url))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, SyncError::ExternalService { .. }));
        mock.assert_async().await;
    }
}
