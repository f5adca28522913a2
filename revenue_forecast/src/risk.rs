//! Growth-based overstatement risk flag

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use series_math::returns;
use std::fmt;

/// Outcome of the growth comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFlag {
    Normal,
    Abnormal,
}

impl RiskFlag {
    /// Fixed dashboard message for the flag
    pub fn message(self) -> &'static str {
        match self {
            RiskFlag::Normal => "Forecast within reasonable range. No major red flags.",
            RiskFlag::Abnormal => {
                "Revenue forecast shows abnormal growth. Review for overstatement risk."
            }
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFlag::Normal => write!(f, "normal"),
            RiskFlag::Abnormal => write!(f, "abnormal"),
        }
    }
}

/// Threshold rule: abnormal when forecast growth exceeds `multiplier` times the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthRule {
    pub multiplier: f64,
}

impl Default for GrowthRule {
    fn default() -> Self {
        Self { multiplier: 2.0 }
    }
}

/// Inputs and result of one assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Mean period-over-period growth of the history
    pub avg_growth: f64,
    /// Growth from the last actual to the first forecast
    pub forecast_growth: f64,
    /// Growth above which the forecast is abnormal
    pub threshold: f64,
    pub flag: RiskFlag,
}

impl GrowthRule {
    /// Rule with a custom multiplier
    pub fn new(multiplier: f64) -> Result<Self> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "growth multiplier must be positive, got {}",
                multiplier
            )));
        }
        Ok(Self { multiplier })
    }

    /// Classify precomputed growth rates.
    ///
    /// With a positive baseline the forecast is abnormal when it grows
    /// strictly faster than `multiplier * avg_growth`. With a flat or
    /// shrinking baseline any positive forecast growth is abnormal.
    pub fn classify(&self, avg_growth: f64, forecast_growth: f64) -> Result<RiskAssessment> {
        if !avg_growth.is_finite() || !forecast_growth.is_finite() {
            return Err(ForecastError::InvalidData(format!(
                "growth rates must be finite (average {}, forecast {})",
                avg_growth, forecast_growth
            )));
        }

        let threshold = if avg_growth > 0.0 {
            self.multiplier * avg_growth
        } else {
            0.0
        };
        let flag = if forecast_growth > threshold {
            RiskFlag::Abnormal
        } else {
            RiskFlag::Normal
        };

        Ok(RiskAssessment {
            avg_growth,
            forecast_growth,
            threshold,
            flag,
        })
    }

    /// Compare the first forecast quarter against the historical growth rate
    pub fn assess(&self, history: &TimeSeries, first_forecast: f64) -> Result<RiskAssessment> {
        let last = history
            .last()
            .ok_or_else(|| ForecastError::DataError("History is empty".to_string()))?;

        let avg_growth = history.mean_growth()?;
        let forecast_growth = returns::growth_between(last.value, first_forecast);
        self.classify(avg_growth, forecast_growth)
    }
}
