//! Operating income derived from revenue by a random margin

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Range of the per-quarter operating margin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeSettings {
    /// Lowest margin (inclusive)
    pub low: f64,
    /// Highest margin (inclusive)
    pub high: f64,
}

impl Default for IncomeSettings {
    fn default() -> Self {
        Self {
            low: 0.15,
            high: 0.20,
        }
    }
}

impl IncomeSettings {
    /// Check the margin range is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.low.is_finite() && self.high.is_finite()) || self.low > self.high {
            return Err(ForecastError::InvalidParameter(format!(
                "operating margin range must satisfy low <= high, got [{}, {}]",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

/// Multiply each revenue value by an independent margin from the configured range
pub fn simulate_operating_income<R: Rng + ?Sized>(
    revenue: &TimeSeries,
    settings: &IncomeSettings,
    rng: &mut R,
) -> Result<TimeSeries> {
    settings.validate()?;

    let margin = Uniform::new_inclusive(settings.low, settings.high);
    revenue.map_values("Operating Income", |_, value| value * margin.sample(&mut *rng))
}
