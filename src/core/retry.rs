use crate::utils::error::{Result, SyncError};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Delay before retry N is `backoff[N - 1]`; the last entry repeats.
    pub backoff: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// 不重試，遇到錯誤直接回傳
    pub fn none() -> Self {
        Self::new(1, Vec::new())
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        let index = retry.saturating_sub(1) as usize;
        self.backoff
            .get(index)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            4,
            vec![
                Duration::from_secs(5),
                Duration::from_secs(15),
                Duration::from_secs(30),
            ],
        )
    }
}

/// 只在 `is_transient` 成立時依 `policy` 重試 `operation`
///
/// Returns the first success, the first non-transient error, or the last
/// transient error once the attempts are used up.
pub async fn with_backoff<T, F, Fut, P>(
    policy: &RetryPolicy,
    what: &str,
    is_transient: P,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&SyncError) -> bool,
{
    let mut attempt: u32 = 1;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("✅ {} succeeded on attempt {}", what, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < policy.max_attempts && is_transient(&e) => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "⏳ {} blocked (attempt {}/{}), retrying in {:?}: {}",
                    what,
                    attempt,
                    policy.max_attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if is_transient(&e) {
                    tracing::error!("❌ {} still blocked after {} attempts", what, attempt);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn blocked() -> SyncError {
        SyncError::TransientBlock {
            status: 429,
            body: "error code: 1015".to_string(),
        }
    }

    fn instant_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, vec![Duration::ZERO])
    }

    #[test]
    fn test_delay_schedule_repeats_last_entry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(2), Duration::from_secs(15));
        assert_eq!(policy.delay_for(3), Duration::from_secs(30));
        assert_eq!(policy.delay_for(9), Duration::from_secs(30));
        assert_eq!(RetryPolicy::none().delay_for(1), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_backoff(&instant_policy(4), "GET channel", SyncError::is_transient_block, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(blocked())
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<()> =
            with_backoff(&instant_policy(3), "PATCH channel", SyncError::is_transient_block, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(blocked()) }
            })
            .await;

        assert!(matches!(result, Err(SyncError::TransientBlock { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> =
            with_backoff(&instant_policy(5), "GET channel", SyncError::is_transient_block, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SyncError::RemoteReadError {
                        status: 404,
                        body: "Unknown Channel".to_string(),
                    })
                }
            })
            .await;

        assert!(matches!(result, Err(SyncError::RemoteReadError { status: 404, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
