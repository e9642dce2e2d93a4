//! Exponential backoff around the model call.

use std::future::Future;
use std::time::Duration;

use rivalscope_analyzer::AnalyzerError;

/// Runs `operation`, retrying up to `max_retries` more times while the error
/// is [`AnalyzerError::is_transient`]. Sleeps `backoff_base_secs * 2^n`
/// seconds before retry `n + 1`.
///
/// The caller's deadline bounds the total time; nothing here caps it.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, AnalyzerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AnalyzerError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs,
                    error = %err,
                    "orchestrator: transient model error, retrying after backoff"
                );
                tokio::time::sleep(Duration::from_secs(delay_secs)).await;
                attempt += 1;
            }
        }
    }
}
