//! Entrypoint.

use config::{CostOpts, try_parse_opts};
use dotenvy::dotenv;
use estimator::{BlockRangeCostEstimator, EstimatorConfig};
use network::HttpNodeClient;
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        println!("ERROR: {err:#}");
    }
}

async fn run() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts: CostOpts = try_parse_opts()?;
    // Logs go to stderr so stdout only carries the summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    info!(rpc = %opts.rpc, query_range = opts.query_range, "estimating blob cost");

    let config = EstimatorConfig::from_opts(opts.query_range, &opts.estimator);
    let report = BlockRangeCostEstimator::new(HttpNodeClient::new(opts.rpc), config).run().await?;
    print!("{report}");
    Ok(())
}
