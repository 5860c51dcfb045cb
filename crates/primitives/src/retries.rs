use std::time::Duration;

use tokio_retry::{RetryIf, strategy::ExponentialBackoff};

/// The default maximum number of retries for a transient error.
///
/// With a 100ms first delay doubling up to [`DEFAULT_MAX_BACKOFF`], three retries take
/// ~700ms before the error is surfaced.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// The default initial backoff time in milliseconds.
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;

/// Upper bound for a single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// A retry strategy trait.
pub trait Strategy: Iterator<Item = Duration> + Clone + Send + Sync + 'static {}

/// Implement the Strategy trait for any type that is an iterator of Durations (i.e. all backoffs
/// exported by `tokio_retry`)
impl<T> Strategy for T where T: Iterator<Item = Duration> + Clone + Send + Sync + 'static {}

/// The default backoff schedule: 100ms, 200ms, 400ms.
pub fn default_backoff() -> impl Strategy {
    // `from_millis(2).factor(50)` yields 2^n * 50ms
    ExponentialBackoff::from_millis(2)
        .factor(DEFAULT_INITIAL_BACKOFF_MS / 2)
        .max_delay(DEFAULT_MAX_BACKOFF)
        .take(DEFAULT_MAX_RETRIES)
}

/// Retry the provided async operation using [`ExponentialBackoff`].
///
/// Retries are attempted as long as the provided `condition` returns `true` for
/// the error produced by the operation, up to [`DEFAULT_MAX_RETRIES`] times.
pub async fn retry_with_backoff_if<F, Fut, T, E, C>(op: F, condition: C) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    C: FnMut(&E) -> bool,
{
    RetryIf::spawn(default_backoff(), op, condition).await
}
