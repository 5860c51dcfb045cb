//! Transient aggregates collected while sampling a block range.
use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use tracing::warn;

use crate::gas::GasParams;

/// Chain identity and tip, read once from node status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// Chain ID reported by the node
    pub chain_id: String,
    /// Latest committed height
    pub latest_height: i64,
}

/// Size information for a single sampled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSample {
    /// Block height
    pub height: i64,
    /// Block timestamp
    pub time: DateTime<Utc>,
    /// Serialized block size without the last commit
    pub raw_size: usize,
    /// Number of transactions in the block
    pub tx_count: usize,
}

/// A fee amount in a single denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    /// Denomination
    pub denom: String,
    /// Amount in base units
    pub amount: u128,
}

impl Coin {
    /// Create a new [`Coin`].
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self { denom: denom.into(), amount }
    }
}

/// Amount of `denom` in `coins`, `0` if absent.
pub fn amount_of(coins: &[Coin], denom: &str) -> u128 {
    coins.iter().find(|c| c.denom == denom).map_or(0, |c| c.amount)
}

/// First denomination in `coins` other than `denom`.
pub fn foreign_denom<'a>(coins: &'a [Coin], denom: &str) -> Option<&'a str> {
    coins.iter().map(|c| c.denom.as_str()).find(|d| *d != denom)
}

/// Running totals across a sampled block range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeAccumulator {
    /// Sum of block payload sizes
    pub total_block_size: usize,
    /// Sum of per-block blob gas estimates
    pub total_gas_estimate: u64,
    /// Fees paid by successful transactions, in `fee_denom`
    pub total_tx_fees: i64,
    /// Denomination of the first successful fee seen
    pub fee_denom: Option<String>,
    /// Blocks that contributed to the totals
    pub blocks_sampled: u64,
    /// Blocks skipped for having no transactions
    pub empty_blocks: u64,
    /// Transactions skipped for a nonzero result code
    pub failed_txs: u64,
}

impl FeeAccumulator {
    /// Add a non-empty block's payload size and its blob gas estimate.
    pub fn record_block(&mut self, sample: &BlockSample, params: &GasParams) {
        self.total_block_size = self.total_block_size.saturating_add(sample.raw_size);
        self.total_gas_estimate =
            self.total_gas_estimate.saturating_add(params.estimate_single_blob(sample.raw_size));
        self.blocks_sampled += 1;
    }

    /// Add the fee of a successful transaction.
    ///
    /// The first fee seen fixes the denomination for the whole range. Later fees only
    /// contribute their amount in that denomination.
    pub fn add_fee(&mut self, fee: &[Coin]) -> Result<()> {
        let Some(first) = fee.first() else {
            return Ok(());
        };
        let denom = self.fee_denom.get_or_insert_with(|| first.denom.clone());

        if let Some(other) = foreign_denom(fee, denom) {
            warn!(fixed = %denom, seen = %other, "fee paid in a different denomination");
        }

        let amount = amount_of(fee, denom);
        let amount = i64::try_from(amount).map_err(|_| eyre!("fee amount {amount} overflows i64"))?;
        self.total_tx_fees = self
            .total_tx_fees
            .checked_add(amount)
            .ok_or_else(|| eyre!("total transaction fees overflow i64"))?;
        Ok(())
    }
}
