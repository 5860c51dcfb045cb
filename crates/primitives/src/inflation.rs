use chrono::TimeDelta;

/// Milliseconds in a 365-day year.
pub const MILLIS_PER_YEAR: f64 = 1000.0 * 60.0 * 60.0 * 24.0 * 365.0;

/// Epochs per year for chains that mint once a day.
pub const EPOCHS_PER_YEAR: f64 = 365.0;

/// Tokens issued over `window` given the yearly issuance.
pub fn inflation_over_window(annual_provisions: f64, window: TimeDelta) -> f64 {
    annual_provisions * window.num_milliseconds() as f64 / MILLIS_PER_YEAR
}

/// Inflation estimate for a sampled window of blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InflationEstimate {
    /// Yearly issuance reported by the mint module
    pub annual_provisions: f64,
    /// Elapsed time between the first and last sampled block
    pub window: TimeDelta,
    /// Tokens issued over the window
    pub estimated_inflation: f64,
}

impl InflationEstimate {
    /// Create a new [`InflationEstimate`] for the given issuance and window.
    pub fn new(annual_provisions: f64, window: TimeDelta) -> Self {
        Self {
            annual_provisions,
            window,
            estimated_inflation: inflation_over_window(annual_provisions, window),
        }
    }
}
