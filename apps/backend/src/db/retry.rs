//! Bounded retry for idempotent reads.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::domain::DomainError;

const BASE_DELAY_MS: u64 = 20;

/// Run `op` up to `attempts` times while it fails with a transient
/// storage error (`DomainError::is_transient`). Other errors return
/// immediately. Only use for reads: a retried write could apply twice.
pub async fn retry_read<T, F, Fut>(attempts: u32, mut op: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!(attempt, attempts, error = %e, "transient read failure; retrying");
                tokio::time::sleep(Duration::from_millis(BASE_DELAY_MS * u64::from(attempt)))
                    .await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
