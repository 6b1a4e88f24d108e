//! Exponential backoff for transient transport failures.
//!
//! Only [`reqwest::Error`]s are retried. Any HTTP response, whatever its
//! status, is handed back to the caller on the first attempt.

use std::time::Duration;

/// Retries after the initial request.
const MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles on each retry (200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Call `f` until it yields a response or `MAX_RETRIES + 1` attempts fail.
pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            // A timed-out request already waited the full client timeout.
            Err(e) if e.is_timeout() => return Err(e),
            Err(e) => {
                let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn exhausts_all_attempts_when_connection_is_refused() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let result = retry_send(|| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                reqwest::Client::new().get("http://127.0.0.1:1/").send().await
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_RETRIES + 1);
    }
}
