use crate::api::RedditApi;
use crate::request::ApiRequest;
use redditkit_core::{CoreError, ErrorExt, ToolkitConfig};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one
    pub retries: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn from_config(config: &ToolkitConfig) -> Self {
        Self::new(config.retries, config.delay())
    }

    /// A policy of zero retries still makes one attempt.
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }
}

/// Retry executor that wraps API requests with retry logic.
///
/// Only transient failures (see [`ErrorExt::is_retryable`]) are retried. The
/// error returned after the last attempt is the original one, unwrapped.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends `request` to `api`, retrying transient failures.
    pub async fn execute<A, R>(&self, api: &A, request: &R) -> Result<R::Output, CoreError>
    where
        A: RedditApi,
        R: ApiRequest,
    {
        let operation_name = request.describe();
        self.run(&operation_name, || request.send(api)).await
    }

    /// Runs an arbitrary operation under the retry policy.
    pub async fn run<F, Fut, T>(&self, operation_name: &str, mut operation: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let attempts = self.policy.attempts();
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 1 {
                        info!(
                            "Operation {} succeeded on attempt {}/{}",
                            operation_name, attempt, attempts
                        );
                    }
                    return Ok(result);
                }
                Err(error) if !error.is_retryable() => {
                    debug!(
                        "Not retrying {} due to error type: {}",
                        operation_name, error
                    );
                    return Err(error);
                }
                Err(error) => {
                    warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt, attempts, operation_name, error
                    );

                    if attempt >= attempts {
                        error!(
                            "Operation {} failed after {} attempts",
                            operation_name, attempts
                        );
                        return Err(error);
                    }

                    sleep(self.policy.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
