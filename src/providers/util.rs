use anyhow::Result;
use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Sends a request, retrying on connection errors and 5xx responses.
///
/// `retries` is the number of extra attempts after the first one, with
/// `delay_ms` between attempts. When retries run out the last error is
/// returned, or the last server error response so the caller can report its
/// status.
pub async fn with_retry<F, Fut>(mut request: F, retries: usize, delay_ms: u64) -> Result<Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = reqwest::Result<Response>>,
{
    let mut attempt = 1;
    loop {
        match request().await {
            Ok(response) if response.status().is_server_error() && attempt <= retries => {
                debug!(
                    "Attempt {}/{} got {}. Retrying...",
                    attempt,
                    retries + 1,
                    response.status()
                );
            }
            Err(err) if attempt <= retries => {
                debug!("Attempt {}/{} failed: {}. Retrying...", attempt, retries + 1, err);
            }
            outcome => return Ok(outcome?),
        }
        attempt += 1;
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
