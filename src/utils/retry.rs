use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{error::Elapsed, timeout};

/// Linear backoff retry bounded by one overall deadline.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub overall_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(400),
            overall_timeout: Duration::from_millis(12_000),
        }
    }
}

impl RetryPolicy {
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            overall_timeout: Duration::from_millis(timeout_ms),
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt + 1` (attempt counts from 0).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }
}

/// Runs `operation` until it succeeds, fails with an error `should_retry`
/// rejects, or runs out of retries. The whole loop, sleeps included, is cut
/// off at `policy.overall_timeout`; the caller's error type decides what an
/// elapsed deadline becomes.
pub async fn with_retry_and_timeout<F, Fut, T, E, R>(
    policy: &RetryPolicy,
    operation_name: &str,
    should_retry: R,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display + From<Elapsed>,
    R: Fn(&E) -> bool,
{
    let attempts = async {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!("'{}' succeeded after {} retries", operation_name, attempt);
                    }
                    return Ok(value);
                }
                Err(err) if attempt < policy.max_retries && should_retry(&err) => {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(
                        "'{}' failed on attempt {}: {}; retrying in {}ms",
                        operation_name,
                        attempt + 1,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    };

    match timeout(policy.overall_timeout, attempts).await {
        Ok(result) => result,
        Err(elapsed) => {
            tracing::warn!(
                "'{}' timed out after {}ms",
                operation_name,
                policy.overall_timeout.as_millis()
            );
            Err(E::from(elapsed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
            overall_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn backoff_is_linear() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(400));
        assert_eq!(policy.delay_for(1), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn retries_only_retryable_errors() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: AppResult<()> = with_retry_and_timeout(
            &fast_policy(),
            "op",
            |e| matches!(e, AppError::Upstream(_)),
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::validation("bad input"))
                }
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result: AppResult<()> = with_retry_and_timeout(
            &fast_policy(),
            "op",
            |_| true,
            || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(AppError::upstream("rate limited"))
                }
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn succeeds_after_a_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let result = with_retry_and_timeout(&fast_policy(), "op", |_| true, || {
            let counter = counter.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::upstream("busy"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn overall_deadline_maps_to_timeout() {
        let policy = RetryPolicy {
            overall_timeout: Duration::from_millis(20),
            ..fast_policy()
        };
        let result: AppResult<()> = with_retry_and_timeout(&policy, "slow", |_| true, || async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
