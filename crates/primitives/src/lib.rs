//! Core primitives for the Blobscope project.
/// Blob gas estimation
pub mod gas;
/// Issuance and inflation helpers
pub mod inflation;
/// Retry helpers with exponential backoff
pub mod retries;
/// Per-run sample and accumulator types
pub mod samples;
