use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::RetryConfig;

pub struct RetryPolicy {
    max_retries: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_backoff_ms, config.max_backoff_ms)
    }

    /// Retry a future with exponential backoff while `should_retry` accepts the error.
    pub async fn retry<F, Fut, T, E, P>(
        &self,
        operation_name: &str,
        should_retry: P,
        mut f: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;
        let mut backoff = self.initial_backoff;

        loop {
            match f().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            attempts = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if !should_retry(&e) => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        warn!(
                            operation = operation_name,
                            attempts = attempt,
                            error = %e,
                            "Operation failed after max retries"
                        );
                        return Err(e);
                    }

                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        max_retries = self.max_retries,
                        backoff_ms = backoff.as_millis(),
                        error = %e,
                        "Operation failed, retrying"
                    );

                    sleep(backoff).await;

                    backoff = std::cmp::min(backoff * 2, self.max_backoff);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retries_transient_errors_until_success() {
        let policy = RetryPolicy::new(3, 1, 2);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result = policy
            .retry("embed", EmbeddingError::is_transient, move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(EmbeddingError::Connection("refused".to_string()))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 1);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result: Result<(), _> = policy
            .retry("embed", EmbeddingError::is_transient, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(EmbeddingError::Connection("refused".to_string()))
            })
            .await;

        assert!(matches!(result, Err(EmbeddingError::Connection(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_permanent_errors() {
        let policy = RetryPolicy::new(5, 1, 1);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let result: Result<(), _> = policy
            .retry("embed", EmbeddingError::is_transient, move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(EmbeddingError::Request("400 Bad Request".to_string()))
            })
            .await;

        assert!(matches!(result, Err(EmbeddingError::Request(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
