//! Blobscope configuration
use clap::Parser;
use url::Url;

/// Default number of blocks to sample.
pub const DEFAULT_QUERY_RANGE: &str = "100";

/// Estimator tuning options shared by both binaries
#[derive(Debug, Clone, Parser)]
pub struct EstimatorOpts {
    /// Milliseconds to wait between per-height fetches
    #[clap(long, env = "BLOBCOST_DELAY_MS", default_value = "100")]
    pub delay_ms: u64,
    /// Minimum gas price in utia
    #[clap(long, env = "BLOBCOST_MIN_GAS_PRICE", default_value = "0.002")]
    pub min_gas_price: f64,
    /// Gas charged per share byte occupied by a blob
    #[clap(long, env = "BLOBCOST_GAS_PER_BLOB_BYTE", default_value = "8")]
    pub gas_per_blob_byte: u32,
    /// Gas charged per transaction byte
    #[clap(long, env = "BLOBCOST_TX_SIZE_COST_PER_BYTE", default_value = "10")]
    pub tx_size_cost_per_byte: u64,
}

/// CLI options for `blobcost`
#[derive(Debug, Clone, Parser)]
#[clap(name = "blobcost", about = "Estimate the cost of posting recent blocks as blobs")]
pub struct CostOpts {
    /// Consensus node RPC URL
    #[clap(env = "RPC_URL")]
    pub rpc: Url,
    /// Number of most recent blocks to sample
    #[clap(env = "QUERY_RANGE", default_value = DEFAULT_QUERY_RANGE, value_parser = clap::value_parser!(u64).range(1..))]
    pub query_range: u64,
    /// Estimator tuning
    #[clap(flatten)]
    pub estimator: EstimatorOpts,
}

/// CLI options for `blobcost-inflation`
#[derive(Debug, Clone, Parser)]
#[clap(
    name = "blobcost-inflation",
    about = "Compare the blob cost of recent blocks with the fees and inflation they paid"
)]
pub struct InflationOpts {
    /// Consensus node RPC URL
    #[clap(env = "RPC_URL")]
    pub rpc: Url,
    /// Cosmos REST (LCD) URL
    #[clap(env = "REST_URL")]
    pub rest: Url,
    /// Number of most recent blocks to sample
    #[clap(env = "QUERY_RANGE", default_value = DEFAULT_QUERY_RANGE, value_parser = clap::value_parser!(u64).range(1..))]
    pub query_range: u64,
    /// Estimator tuning
    #[clap(flatten)]
    pub estimator: EstimatorOpts,
}

/// Parse `T` from the process arguments.
///
/// Help and version requests print and exit, every other parse failure is returned.
pub fn try_parse_opts<T: Parser>() -> Result<T, clap::Error> {
    T::try_parse().map_err(|e| {
        if !e.use_stderr() {
            e.exit();
        }
        e
    })
}
