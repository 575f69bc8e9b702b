use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Bounded exponential backoff policy for one network operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling, including the first try.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per attempt after that.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay inserted after attempt number `attempt` (1-based) fails.
    /// The exponent is clamped so the delay stops growing after a few
    /// attempts instead of overflowing.
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * (1u32 << attempt.saturating_sub(1).min(5))
    }
}

/// Run `action` until it succeeds, the error is not retryable, or the
/// attempt ceiling is reached. Sleeps between attempts per the policy;
/// under tokio's paused test clock those sleeps complete instantly.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    is_retryable: impl Fn(&E) -> bool,
    mut action: F,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match action().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts && is_retryable(&err) => {
                let delay = policy.backoff_delay(attempt);
                log::warn!(
                    "Attempt {attempt}/{max_attempts} failed: {err}; retrying in {delay:?}"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> RemoteError {
        RemoteError::from_status(503, "unavailable".into())
    }

    fn client_error() -> RemoteError {
        RemoteError::from_status(400, "bad request".into())
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), RemoteError::is_retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, RemoteError>(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures_then_succeeds() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&RetryPolicy::default(), RemoteError::is_retryable, || {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if call < 2 {
                    Err(server_error())
                } else {
                    Ok("stored")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "stored");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> =
            with_retry(&RetryPolicy::default(), RemoteError::is_retryable, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(client_error()) }
            })
            .await;

        assert!(matches!(result, Err(RemoteError::Client { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_attempt_ceiling() {
        let policy = RetryPolicy {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
        };
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&policy, RemoteError::is_retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(server_error()) }
        })
        .await;

        assert!(matches!(result, Err(RemoteError::Server { status: 503, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_backoff_doubles_then_clamps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
        };

        assert_eq!(policy.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_delay(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_delay(6), Duration::from_millis(3200));
        assert_eq!(policy.backoff_delay(7), Duration::from_millis(3200));
        assert_eq!(policy.backoff_delay(20), Duration::from_millis(3200));
    }
}
