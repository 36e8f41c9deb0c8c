//! Fixed-delay retry for collaborator fetches

use super::FetchError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Attempt count and fixed delay between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// `NotFound` is returned immediately; retrying cannot make data appear.
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err @ FetchError::NotFound(_)) => return Err(err),
            Err(err) if attempt >= attempts => {
                tracing::error!(what, attempt, error = %err, "Fetch failed, giving up");
                return Err(FetchError::Exhausted {
                    attempts,
                    last: err.to_string(),
                });
            }
            Err(err) => {
                tracing::warn!(what, attempt, error = %err, "Fetch failed, retrying");
                sleep(policy.delay).await;
            }
        }
    }
}
