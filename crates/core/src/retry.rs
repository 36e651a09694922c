use crate::traits::ClientError;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Timeout and backoff settings applied to every collaborator call made by
/// the ingestion and query paths.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_delay: Duration,
    /// Upper bound on a single collaborator call. An elapsed timeout counts
    /// as a transient failure.
    pub call_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries, for callers that prefer to surface the
    /// first failure.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Runs `operation` until it succeeds, fails permanently, or exhausts
    /// the attempt budget. Only transient failures are retried.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;

        loop {
            let outcome = match timeout(self.call_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(ClientError::Transient(format!(
                    "call exceeded timeout of {:?}",
                    self.call_timeout
                ))),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && attempt < self.max_attempts.max(1) => {
                    tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, %error, "retrying transient collaborator failure");
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RetryPolicy;
    use crate::traits::ClientError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            call_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let calls = AtomicU32::new(0);
        let result = fast_policy()
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ClientError::Transient("rate limited".to_string()))
                } else {
                    Ok(42u32)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = fast_policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Permanent("text too long".to_string()))
            })
            .await;

        assert!(matches!(result, Err(ClientError::Permanent(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn attempt_budget_is_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = fast_policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Transient("still down".to_string()))
            })
            .await;

        assert!(matches!(result, Err(ClientError::Transient(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn timeouts_count_as_transient() {
        let policy = RetryPolicy {
            max_attempts: 1,
            base_delay: Duration::from_millis(1),
            call_timeout: Duration::from_millis(5),
        };

        let result: Result<u32, _> = policy
            .run(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(1)
            })
            .await;

        assert!(matches!(result, Err(ClientError::Transient(_))));
    }
}
