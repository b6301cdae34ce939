use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::classification::ErrorClassification;
use super::types::ReconError;

impl ErrorClassification {
    /// Calculate the retry delay for this error classification based on the
    /// current attempt number (0-indexed).
    ///
    /// - RateLimitError: 5s + (attempt * 5s), capped at 60s
    /// - Default: exponential backoff 2^attempt + random jitter (0-1s), capped at 10s
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        match self.error_type {
            "RateLimitError" => {
                let secs = 5 + (attempt as u64 * 5);
                Duration::from_secs(secs.min(60))
            }
            _ => {
                let base: f64 = 2.0_f64.powi(attempt as i32);
                let jitter: f64 = rand::random::<f64>();
                let secs = (base + jitter).min(10.0);
                Duration::from_secs_f64(secs)
            }
        }
    }
}

/// Retry configuration for provider lookups.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 2 }
    }
}

/// Execute an async operation with retry logic.
///
/// Retries only if the error is classified as retryable and we haven't
/// exceeded max_retries. Firing `cancel` stops the loop, including during a
/// backoff sleep, and yields `ReconError::Cancelled`.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    config: &RetryConfig,
    cancel: &CancellationToken,
    mut factory: F,
) -> Result<T, ReconError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ReconError>>,
{
    let max_attempts = config.max_retries + 1;

    for attempt in 0..max_attempts {
        if cancel.is_cancelled() {
            return Err(ReconError::Cancelled);
        }

        let err = match factory().await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        let classification = err.classify();
        if !classification.retryable || attempt + 1 >= max_attempts {
            if classification.retryable {
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max = max_attempts,
                    "Max retries exhausted"
                );
            }
            return Err(err);
        }

        let delay = classification.retry_delay(attempt);
        warn!(
            operation = operation_name,
            attempt = attempt + 1,
            max = max_attempts,
            error_type = classification.error_type,
            delay_secs = delay.as_secs(),
            error = %err,
            "Retrying after error"
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(ReconError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }

    Err(ReconError::Internal("Retry loop exited unexpectedly".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_retry_delay_rate_limit() {
        let class = ErrorClassification { error_type: "RateLimitError", retryable: true, surfaced: false };
        assert_eq!(class.retry_delay(0), Duration::from_secs(5));
        assert_eq!(class.retry_delay(1), Duration::from_secs(10));
        assert_eq!(class.retry_delay(20), Duration::from_secs(60)); // capped
    }

    #[test]
    fn test_retry_delay_default_exponential() {
        let class = ErrorClassification { error_type: "NetworkError", retryable: true, surfaced: false };
        let d0 = class.retry_delay(0);
        let d1 = class.retry_delay(1);
        assert!(d0.as_secs_f64() >= 1.0 && d0.as_secs_f64() < 2.0);
        assert!(d1.as_secs_f64() >= 2.0 && d1.as_secs_f64() < 3.0);
        assert!(class.retry_delay(8).as_secs_f64() <= 10.0);
    }

    #[tokio::test]
    async fn test_with_retry_succeeds_first_try() {
        let config = RetryConfig { max_retries: 3 };
        let cancel = CancellationToken::new();
        let result = with_retry("test", &config, &cancel, || async {
            Ok::<_, ReconError>(42)
        }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_retry_non_retryable_fails_immediately() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let config = RetryConfig { max_retries: 3 };
        let cancel = CancellationToken::new();

        let result = with_retry("test", &config, &cancel, || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ReconError::Authentication("bad key".into()))
            }
        }).await;

        assert!(matches!(result, Err(ReconError::Authentication(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_zero_retries_single_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = attempts.clone();
        let config = RetryConfig { max_retries: 0 };
        let cancel = CancellationToken::new();

        let result = with_retry("test", &config, &cancel, || {
            let attempts = attempts_clone.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(ReconError::Network("refused".into()))
            }
        }).await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_cancelled_before_start() {
        let config = RetryConfig::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = with_retry("test", &config, &cancel, || async {
            Ok::<_, ReconError>(1)
        }).await;
        assert!(matches!(result, Err(ReconError::Cancelled)));
    }

    #[tokio::test]
    async fn test_with_retry_cancel_interrupts_backoff() {
        let config = RetryConfig { max_retries: 5 };
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let result = with_retry("test", &config, &cancel, || async {
            Err::<(), _>(ReconError::Network("refused".into()))
        }).await;

        assert!(matches!(result, Err(ReconError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
