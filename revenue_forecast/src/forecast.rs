//! Quarterly revenue forecast engine

use crate::calendar;
use crate::data::{Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::arima::{ArimaModel, FitSummary};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Number of quarters to project, between 1 and 8 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Horizon(usize);

impl Horizon {
    pub const MIN: usize = 1;
    pub const MAX: usize = 8;

    /// Validate a horizon
    pub fn new(quarters: usize) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&quarters) {
            return Err(ForecastError::InvalidParameter(format!(
                "Forecast horizon must be between {} and {} quarters, got {}",
                Self::MIN,
                Self::MAX,
                quarters
            )));
        }
        Ok(Self(quarters))
    }

    /// Number of quarters
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<usize> for Horizon {
    type Error = ForecastError;

    fn try_from(quarters: usize) -> Result<Self> {
        Self::new(quarters)
    }
}

impl From<Horizon> for usize {
    fn from(horizon: Horizon) -> usize {
        horizon.0
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} quarter(s)", self.0)
    }
}

/// Fixed model order used for revenue
pub const REVENUE_ORDER: (usize, usize, usize) = (1, 1, 1);

/// Projected revenue with its model diagnostics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueForecast {
    /// Point forecasts stamped with quarter-end dates
    pub series: TimeSeries,
    /// Raw model output including prediction intervals
    pub result: ForecastResult,
    /// Fit diagnostics
    pub fit: FitSummary,
}

impl RevenueForecast {
    /// First projected quarter
    pub fn first_value(&self) -> Option<f64> {
        self.series.first().map(|o| o.value)
    }
}

/// Fit ARIMA(1,1,1) to `history` and project `horizon` quarters past its last date
pub fn forecast_revenue(
    history: &TimeSeries,
    horizon: Horizon,
    confidence_level: f64,
) -> Result<RevenueForecast> {
    let last = history
        .last()
        .ok_or_else(|| ForecastError::DataError("History is empty".to_string()))?;

    let (p, d, q) = REVENUE_ORDER;
    let model = ArimaModel::new(p, d, q)?.with_confidence_level(confidence_level)?;
    let trained = model.train(history)?;

    let dates = calendar::following_quarter_ends(last.date, horizon.get())?;
    let result = trained.forecast(horizon.get())?.with_timestamps(dates)?;
    let series = result.to_series("Forecast", Frequency::Quarterly)?;

    info!(
        model = trained.name(),
        horizon = horizon.get(),
        first = ?series.first().map(|o| o.value),
        "revenue forecast ready"
    );

    Ok(RevenueForecast {
        series,
        result,
        fit: trained.summary().clone(),
    })
}
