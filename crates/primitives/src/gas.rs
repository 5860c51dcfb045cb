//! Gas estimation for pay-for-blobs transactions.
//!
//! Blobs are laid out in sparse shares of [`SHARE_SIZE`] bytes. The first share of a blob
//! carries a sequence length prefix, so it holds less payload than the continuation shares.

/// Size of a single share in bytes.
pub const SHARE_SIZE: u64 = 512;

/// Size of the namespace prefix of every share.
pub const NAMESPACE_SIZE: u64 = 29;

/// Size of the info byte following the namespace.
pub const SHARE_INFO_BYTES: u64 = 1;

/// Size of the sequence length prefix carried by the first share of a blob.
pub const SEQUENCE_LEN_BYTES: u64 = 4;

/// Payload bytes available in the first sparse share of a blob.
pub const FIRST_SPARSE_SHARE_CONTENT_SIZE: u64 =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES - SEQUENCE_LEN_BYTES;

/// Payload bytes available in every following sparse share.
pub const CONTINUATION_SPARSE_SHARE_CONTENT_SIZE: u64 =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES;

/// Default gas charged per byte of share occupied by a blob.
pub const DEFAULT_GAS_PER_BLOB_BYTE: u32 = 8;

/// Default gas charged per byte of transaction size.
pub const DEFAULT_TX_SIZE_COST_PER_BYTE: u64 = 10;

/// Estimated transaction bytes added for every blob in a pay-for-blobs message.
pub const BYTES_PER_BLOB_INFO: u64 = 70;

/// Fixed gas cost of a pay-for-blobs transaction.
pub const PFB_GAS_FIXED_COST: u64 = 75_000;

/// Default minimum gas price, in `utia` per unit of gas.
pub const DEFAULT_MIN_GAS_PRICE: f64 = 0.002;

/// Number of sparse shares needed to hold a blob of `size` bytes.
pub const fn sparse_shares_needed(size: u32) -> u64 {
    let size = size as u64;
    if size == 0 {
        return 0;
    }
    if size <= FIRST_SPARSE_SHARE_CONTENT_SIZE {
        return 1;
    }
    1 + (size - FIRST_SPARSE_SHARE_CONTENT_SIZE).div_ceil(CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
}

/// Gas consumed by the shares that the given blobs occupy.
pub fn gas_to_consume(blob_sizes: &[u32], gas_per_byte: u32) -> u64 {
    let shares: u64 = blob_sizes.iter().map(|size| sparse_shares_needed(*size)).sum();
    shares.saturating_mul(SHARE_SIZE).saturating_mul(gas_per_byte as u64)
}

/// Estimate the gas of a pay-for-blobs transaction carrying blobs of the given sizes.
pub fn estimate_gas(blob_sizes: &[u32], gas_per_byte: u32, tx_size_cost_per_byte: u64) -> u64 {
    let blob_info = tx_size_cost_per_byte
        .saturating_mul(BYTES_PER_BLOB_INFO)
        .saturating_mul(blob_sizes.len() as u64);
    gas_to_consume(blob_sizes, gas_per_byte)
        .saturating_add(blob_info)
        .saturating_add(PFB_GAS_FIXED_COST)
}

/// [`estimate_gas`] with the default chain parameters.
pub fn default_estimate_gas(blob_sizes: &[u32]) -> u64 {
    estimate_gas(blob_sizes, DEFAULT_GAS_PER_BLOB_BYTE, DEFAULT_TX_SIZE_COST_PER_BYTE)
}

/// Chain parameters that drive the blob submission fee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasParams {
    /// Gas charged per share byte
    pub gas_per_blob_byte: u32,
    /// Gas charged per transaction byte
    pub tx_size_cost_per_byte: u64,
    /// Minimum gas price in `utia`
    pub min_gas_price: f64,
}

impl Default for GasParams {
    fn default() -> Self {
        Self {
            gas_per_blob_byte: DEFAULT_GAS_PER_BLOB_BYTE,
            tx_size_cost_per_byte: DEFAULT_TX_SIZE_COST_PER_BYTE,
            min_gas_price: DEFAULT_MIN_GAS_PRICE,
        }
    }
}

impl GasParams {
    /// Gas needed to post a payload of `size` bytes as a single blob.
    pub fn estimate_single_blob(&self, size: usize) -> u64 {
        let size = u32::try_from(size).unwrap_or(u32::MAX);
        estimate_gas(&[size], self.gas_per_blob_byte, self.tx_size_cost_per_byte)
    }

    /// Fee paid for `gas` units at the minimum gas price.
    pub fn fee(&self, gas: u64) -> f64 {
        gas as f64 * self.min_gas_price
    }
}
