//! Samples a range of recent blocks and prices them as blobs.
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use config::EstimatorOpts;
use derive_more::Debug;
use eyre::{Context, Result, bail};
use network::{NodeClient, ProvisionsSource};
use primitives::{gas::GasParams, inflation::InflationEstimate, samples::FeeAccumulator};
use tracing::{debug, info};

use crate::report::CostReport;

/// Default pause between the block and block results fetch of a height.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Default number of blocks to sample.
pub const DEFAULT_QUERY_RANGE: u64 = 100;

/// Estimator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Number of most recent blocks to sample
    pub query_range: u64,
    /// Pause after fetching each non-empty block
    pub delay: Duration,
    /// Gas parameters used to price the blobs
    pub gas: GasParams,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { query_range: DEFAULT_QUERY_RANGE, delay: DEFAULT_DELAY, gas: GasParams::default() }
    }
}

impl EstimatorConfig {
    /// Build the settings from parsed CLI options.
    pub fn from_opts(query_range: u64, opts: &EstimatorOpts) -> Self {
        Self {
            query_range,
            delay: Duration::from_millis(opts.delay_ms),
            gas: GasParams {
                gas_per_blob_byte: opts.gas_per_blob_byte,
                tx_size_cost_per_byte: opts.tx_size_cost_per_byte,
                min_gas_price: opts.min_gas_price,
            },
        }
    }
}

/// First height of a range of `query_range` blocks ending at `latest_height`, never below 1.
pub fn start_height(latest_height: i64, query_range: u64) -> i64 {
    let range = i64::try_from(query_range).unwrap_or(i64::MAX);
    latest_height.saturating_sub(range).saturating_add(1).max(1)
}

/// Estimates what the most recent blocks of a chain would cost to post as blobs.
#[derive(Debug)]
pub struct BlockRangeCostEstimator<N> {
    node: N,
    #[debug(skip)]
    provisions: Option<Box<dyn ProvisionsSource>>,
    config: EstimatorConfig,
}

impl<N: NodeClient> BlockRangeCostEstimator<N> {
    /// Create an estimator that reads blocks from `node`.
    pub fn new(node: N, config: EstimatorConfig) -> Self {
        Self { node, provisions: None, config }
    }

    /// Also estimate the inflation over the sampled window using `provisions`.
    pub fn with_provisions(mut self, provisions: impl ProvisionsSource + 'static) -> Self {
        self.provisions = Some(Box::new(provisions));
        self
    }

    /// Sample the configured range and build the report.
    pub async fn run(&self) -> Result<CostReport> {
        let chain = self.node.status().await.wrap_err("failed to query node status")?;
        info!(chain_id = %chain.chain_id, latest_height = chain.latest_height, "sampling blocks");

        let annual_provisions = match &self.provisions {
            Some(source) => Some(
                source
                    .annual_provisions(&chain.chain_id)
                    .await
                    .wrap_err("failed to fetch annual provisions")?,
            ),
            None => None,
        };

        let start = start_height(chain.latest_height, self.config.query_range);
        let mut acc = FeeAccumulator::default();
        let mut first_time: Option<DateTime<Utc>> = None;
        let mut last_time: Option<DateTime<Utc>> = None;

        for height in start..=chain.latest_height {
            let block = self
                .node
                .block(height)
                .await
                .wrap_err_with(|| format!("failed to get block {height}"))?;

            if block.txs.is_empty() {
                debug!(height, "skipping empty block");
                acc.empty_blocks += 1;
                continue;
            }

            let sample = block.sample();
            first_time.get_or_insert(sample.time);
            last_time = Some(sample.time);

            if !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }

            let results = self
                .node
                .block_results(height)
                .await
                .wrap_err_with(|| format!("failed to get block results for block {height}"))?;
            if results.len() != block.txs.len() {
                bail!(
                    "mismatch between block txs and tx results ({} != {})",
                    results.len(),
                    block.txs.len()
                );
            }

            for (idx, (raw, outcome)) in block.txs.iter().zip(&results).enumerate() {
                if !outcome.is_success() {
                    acc.failed_txs += 1;
                    continue;
                }
                let fee = codec::decode_fee(raw)
                    .wrap_err_with(|| format!("failed to unmarshal tx {idx} of block {height}"))?;
                acc.add_fee(&fee)?;
            }

            acc.record_block(&sample, &self.config.gas);
            debug!(height, txs = sample.tx_count, size = sample.raw_size, "sampled block");
        }

        let window = match (first_time, last_time) {
            (Some(first), Some(last)) => last - first,
            _ => TimeDelta::zero(),
        };

        info!(
            blocks_sampled = acc.blocks_sampled,
            empty_blocks = acc.empty_blocks,
            failed_txs = acc.failed_txs,
            size = acc.total_block_size,
            gas = acc.total_gas_estimate,
            "finished sampling"
        );

        Ok(CostReport {
            block_count: u64::try_from(chain.latest_height - start + 1).unwrap_or_default(),
            chain,
            start_height: start,
            window,
            total_block_size: acc.total_block_size,
            total_gas_estimate: acc.total_gas_estimate,
            estimated_fee: self.config.gas.fee(acc.total_gas_estimate),
            total_tx_fees: acc.total_tx_fees,
            fee_denom: acc.fee_denom,
            inflation: annual_provisions.map(|annual| InflationEstimate::new(annual, window)),
        })
    }
}
