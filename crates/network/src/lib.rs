//! Network clients for Blobscope.
#![allow(clippy::uninlined_format_args)]

mod error;
/// Retry policy for HTTP calls
pub mod http_retry;
/// Mint module REST client
pub mod mint;
/// Consensus node JSON-RPC client
pub mod node;

pub use error::NetworkError;
pub use mint::{MintClient, ProvisionsSource};
pub use node::{HttpNodeClient, NodeBlock, NodeClient, TxOutcome};
