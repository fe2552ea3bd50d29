//! Async retry with a fixed interval between attempts

use std::time::Duration;

/// Retry an async operation a bounded number of times with a fixed delay.
///
/// Returns `Ok((value, attempts))` on success, or `Err((error, attempts))`
/// once `max_attempts` have failed.
pub async fn retry_fixed_async<F, Fut, T, E>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<(T, u32), (E, u32)>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        match operation().await {
            Ok(value) => return Ok((value, attempts)),
            Err(e) => {
                if attempts >= max_attempts {
                    return Err((e, attempts));
                }
                tracing::warn!(
                    error = %e,
                    attempt = attempts,
                    delay_secs = delay.as_secs(),
                    "Retrying after transient error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
