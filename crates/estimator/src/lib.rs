//! Blob cost estimation over a range of recent blocks.
pub mod duration;
pub mod estimator;
pub mod report;

pub use estimator::{BlockRangeCostEstimator, EstimatorConfig, start_height};
pub use report::CostReport;
