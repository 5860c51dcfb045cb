//! Wire formats consumed by Blobscope.
//!
//! Covers the JSON shapes returned by a Tendermint/CometBFT node, their protobuf
//! counterparts (used to measure a block's serialized size) and the fee section of
//! Cosmos transaction envelopes.

mod convert;
mod error;
/// Protobuf block types
pub mod proto;
/// JSON-RPC response types
pub mod rpc;
mod serde_helpers;
/// Transaction envelope decoding
pub mod tx;

pub use convert::{block_payload_size, decode_txs};
pub use error::CodecError;
pub use tx::decode_fee;
