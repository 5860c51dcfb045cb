use primitives::retries::retry_with_backoff_if;
use reqwest::StatusCode;
use tracing::warn;

use crate::error::NetworkError;

/// Determine if a [`NetworkError`] is worth retrying.
pub fn is_retryable(err: &NetworkError) -> bool {
    match err {
        NetworkError::Http(req_err) => {
            if req_err.is_timeout() || req_err.is_connect() {
                return true;
            }
            req_err.status().is_some_and(is_retryable_status)
        }
        NetworkError::UnexpectedStatus { status, .. } => is_retryable_status(*status),
        _ => false,
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Retry the provided async operation with exponential backoff if the returned
/// error is considered retryable.
pub(crate) async fn retry_op<F, Fut, T>(op: F) -> Result<T, NetworkError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, NetworkError>>,
{
    retry_with_backoff_if(op, |err: &NetworkError| {
        let retry = is_retryable(err);
        if retry {
            warn!(error = %err, "transient network error, retrying");
        }
        retry
    })
    .await
}
