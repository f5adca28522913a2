//! Simulated quarterly revenue history

use crate::calendar;
use crate::data::{Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of the simulated revenue history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Any date inside the first quarter
    pub start: NaiveDate,
    /// Number of quarters to generate
    pub periods: usize,
    /// Mean quarterly revenue
    pub mean: f64,
    /// Standard deviation of quarterly revenue
    pub std_dev: f64,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            periods: 24,
            mean: 6.0,
            std_dev: 0.3,
        }
    }
}

impl HistorySettings {
    /// Check the settings describe a usable distribution
    pub fn validate(&self) -> Result<()> {
        if self.periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "history must contain at least one period".to_string(),
            ));
        }
        if !self.mean.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "history mean must be finite".to_string(),
            ));
        }
        if !(self.std_dev.is_finite() && self.std_dev >= 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "history standard deviation must be a non-negative number, got {}",
                self.std_dev
            )));
        }
        Ok(())
    }
}

/// Draw a quarterly revenue series with independent normal values
pub fn simulate_revenue<R: Rng + ?Sized>(
    settings: &HistorySettings,
    rng: &mut R,
) -> Result<TimeSeries> {
    settings.validate()?;

    let normal = Normal::new(settings.mean, settings.std_dev)
        .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
    let dates = calendar::quarter_ends(settings.start, settings.periods)?;
    let values: Vec<f64> = (0..settings.periods).map(|_| normal.sample(rng)).collect();

    debug!(
        periods = settings.periods,
        first = %dates[0],
        "simulated revenue history"
    );

    TimeSeries::new("Revenue", Frequency::Quarterly, dates, values)
}
