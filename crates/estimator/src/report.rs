//! Summary of a sampled block range.
use std::fmt;

use chrono::TimeDelta;
use primitives::{inflation::InflationEstimate, samples::ChainSnapshot};

use crate::duration::{format_duration, round_to_seconds};

/// Outcome of a sampled block range.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    /// Chain the blocks were sampled from
    pub chain: ChainSnapshot,
    /// First sampled height
    pub start_height: i64,
    /// Number of heights in the range, empty blocks included
    pub block_count: u64,
    /// Time between the first and last non-empty block
    pub window: TimeDelta,
    /// Sum of block payload sizes in bytes
    pub total_block_size: usize,
    /// Sum of per-block blob gas estimates
    pub total_gas_estimate: u64,
    /// `total_gas_estimate` priced at the minimum gas price, in utia
    pub estimated_fee: f64,
    /// Fees paid by the successful transactions of the range
    pub total_tx_fees: i64,
    /// Denomination of `total_tx_fees`
    pub fee_denom: Option<String>,
    /// Issuance over the window, when provisions were queried
    pub inflation: Option<InflationEstimate>,
}

impl CostReport {
    /// Transaction fees plus the truncated inflation over the window.
    pub fn total_cost(&self) -> i64 {
        let inflation = self.inflation.map_or(0, |i| i.estimated_inflation as i64);
        self.total_tx_fees.saturating_add(inflation)
    }

    /// Total payload size in whole kilobytes.
    pub const fn total_kb(&self) -> usize {
        self.total_block_size / 1024
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(inflation) = &self.inflation {
            writeln!(
                f,
                "duration {} annualProvisions {} inflation {} txFees {}",
                format_duration(self.window),
                inflation.annual_provisions as i64,
                inflation.estimated_inflation as i64,
                self.total_tx_fees,
            )?;
        }

        writeln!(
            f,
            "{} over the last {} blocks ({} KB & {}) would cost {} utia",
            self.chain.chain_id,
            self.block_count,
            self.total_kb(),
            format_duration(round_to_seconds(self.window)),
            self.estimated_fee as i64,
        )?;

        if self.inflation.is_some() {
            writeln!(
                f,
                "The same blocks cost {} {}",
                self.total_cost(),
                self.fee_denom.as_deref().unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(inflation: Option<InflationEstimate>) -> CostReport {
        CostReport {
            chain: ChainSnapshot { chain_id: "cosmoshub-4".to_owned(), latest_height: 1_000 },
            start_height: 901,
            block_count: 100,
            window: TimeDelta::milliseconds(612_400),
            total_block_size: 2_560_000,
            total_gas_estimate: 9_000_000,
            estimated_fee: 18_000.9,
            total_tx_fees: 1_234,
            fee_denom: Some("uatom".to_owned()),
            inflation,
        }
    }

    #[test]
    fn renders_cost_only_summary() {
        assert_eq!(
            report(None).to_string(),
            "cosmoshub-4 over the last 100 blocks (2500 KB & 10m12s) would cost 18000 utia\n"
        );
    }

    #[test]
    fn renders_inflation_summary() {
        let report = report(Some(InflationEstimate {
            annual_provisions: 1_000_000.7,
            window: TimeDelta::milliseconds(612_400),
            estimated_inflation: 19.9,
        }));

        assert_eq!(report.total_cost(), 1_253);
        assert_eq!(
            report.to_string(),
            "duration 10m12.4s annualProvisions 1000000 inflation 19 txFees 1234\n\
             cosmoshub-4 over the last 100 blocks (2500 KB & 10m12s) would cost 18000 utia\n\
             The same blocks cost 1253 uatom\n"
        );
    }

    #[test]
    fn missing_denom_renders_empty() {
        let mut report = report(Some(InflationEstimate::new(0.0, TimeDelta::zero())));
        report.fee_denom = None;
        report.window = TimeDelta::zero();
        assert!(report.to_string().ends_with("The same blocks cost 1234 \n"));
        assert!(report.to_string().starts_with("duration 0s "));
    }

    #[test]
    fn total_cost_without_inflation_is_tx_fees() {
        assert_eq!(report(None).total_cost(), 1_234);
    }
}
