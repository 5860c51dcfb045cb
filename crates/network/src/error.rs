use codec::CodecError;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the node and REST clients.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-200 status
    #[error("unexpected status code from query {url}: {status}")]
    UnexpectedStatus {
        /// Queried URL
        url: String,
        /// Returned status
        status: StatusCode,
    },
    /// The node returned a JSON-RPC error object
    #[error("jsonrpc error calling {method} ({code}): {message}")]
    Rpc {
        /// Called method
        method: &'static str,
        /// Error code
        code: i64,
        /// Error message, with data appended when present
        message: String,
    },
    /// The response carried neither a result nor an error
    #[error("empty jsonrpc response calling {method}")]
    EmptyResponse {
        /// Called method
        method: &'static str,
    },
    /// The response body did not match the expected shape
    #[error("parsing response to {target}: {source}")]
    Json {
        /// Method or URL that was queried
        target: String,
        /// Underlying error
        source: serde_json::Error,
    },
    /// A decimal field could not be parsed
    #[error("invalid decimal in `{field}`: {value:?}")]
    InvalidDecimal {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
    /// The block could not be decoded
    #[error(transparent)]
    Codec(#[from] CodecError),
}
