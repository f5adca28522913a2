//! The dashboard pipeline
//!
//! Steps run top to bottom, each producing an owned panel that the
//! renderer receives as-is:
//!
//! 1. simulate revenue history
//! 2. fit and forecast
//! 3. fetch the macroeconomic indicator
//! 4. derive operating income
//! 5. flag abnormal forecast growth
//!
//! The history shape, margin range, growth rule and interval coverage are
//! fixed; configuration only names the company and the indicator source.
//!
//! Only configuration or generation errors abort a run. A model that
//! cannot be fitted or an indicator that cannot be fetched turns into an
//! `Unavailable` panel and the remaining steps still complete.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::summary::summary_text;
use chrono::NaiveDate;
use rand::Rng;
use revenue_forecast::forecast::{forecast_revenue, Horizon, RevenueForecast};
use revenue_forecast::income::{simulate_operating_income, IncomeSettings};
use revenue_forecast::indicator::IndicatorSource;
use revenue_forecast::risk::{GrowthRule, RiskAssessment};
use revenue_forecast::synthetic::{simulate_revenue, HistorySettings};
use revenue_forecast::TimeSeries;
use serde::Serialize;
use tracing::{info, warn};

/// Coverage of the forecast prediction intervals
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Forecast step outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ForecastPanel {
    Ready(RevenueForecast),
    Unavailable { reason: String },
}

impl ForecastPanel {
    /// The forecast, when one was produced
    pub fn ready(&self) -> Option<&RevenueForecast> {
        match self {
            ForecastPanel::Ready(forecast) => Some(forecast),
            ForecastPanel::Unavailable { .. } => None,
        }
    }
}

/// Indicator step outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum IndicatorPanel {
    Ready {
        /// Series as delivered by the provider
        series: TimeSeries,
        /// Quarter-end averages aligned with the revenue calendar
        quarterly: TimeSeries,
    },
    Unavailable {
        /// Failure category (timeout, connectivity, provider, malformed)
        category: String,
        /// Message for the reader
        notice: String,
        /// Underlying error text
        detail: String,
    },
    /// Fetch switched off by configuration
    Disabled,
}

/// Risk step outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RiskPanel {
    Assessed(RiskAssessment),
    Unavailable { reason: String },
}

/// Everything one run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub company: String,
    pub horizon: Horizon,
    pub confidence_level: f64,
    pub history: TimeSeries,
    pub forecast: ForecastPanel,
    pub indicator: IndicatorPanel,
    pub operating_income: TimeSeries,
    pub risk: RiskPanel,
    pub summary: String,
}

/// Run the five steps once
pub fn run<R: Rng + ?Sized>(
    config: &DashboardConfig,
    horizon: Horizon,
    today: NaiveDate,
    rng: &mut R,
    source: &dyn IndicatorSource,
) -> Result<Dashboard> {
    config.validate()?;

    let history = simulate_revenue(&HistorySettings::default(), rng)?;
    let forecast = forecast_panel(&history, horizon)?;
    let indicator = indicator_panel(config, today, source);
    let operating_income = simulate_operating_income(&history, &IncomeSettings::default(), rng)?;
    let risk = risk_panel(&history, &forecast);

    info!(
        horizon = horizon.get(),
        forecast_ready = forecast.ready().is_some(),
        "dashboard complete"
    );

    Ok(Dashboard {
        company: config.company.clone(),
        horizon,
        confidence_level: CONFIDENCE_LEVEL,
        history,
        forecast,
        indicator,
        operating_income,
        risk,
        summary: summary_text(&config.company),
    })
}

/// Fit and project `history`, turning model failures into an unavailable panel
pub fn forecast_panel(history: &TimeSeries, horizon: Horizon) -> Result<ForecastPanel> {
    match forecast_revenue(history, horizon, CONFIDENCE_LEVEL) {
        Ok(forecast) => Ok(ForecastPanel::Ready(forecast)),
        Err(err) if err.is_model_failure() => {
            warn!(error = %err, "forecast unavailable");
            Ok(ForecastPanel::Unavailable {
                reason: err.to_string(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

fn indicator_panel(
    config: &DashboardConfig,
    today: NaiveDate,
    source: &dyn IndicatorSource,
) -> IndicatorPanel {
    if !config.indicator.enabled {
        return IndicatorPanel::Disabled;
    }

    let request = config.indicator.request(today);
    let fetched = source.fetch(&request).and_then(|series| {
        let quarterly = series.to_quarterly_mean().map_err(|e| {
            revenue_forecast::IndicatorError::Malformed(format!("cannot resample: {}", e))
        })?;
        Ok((series, quarterly))
    });

    match fetched {
        Ok((series, quarterly)) => IndicatorPanel::Ready { series, quarterly },
        Err(err) => {
            warn!(category = err.category(), error = %err, "indicator unavailable");
            IndicatorPanel::Unavailable {
                category: err.category().to_string(),
                notice: err.notice().to_string(),
                detail: err.to_string(),
            }
        }
    }
}

/// Growth check of the first forecast quarter, when there is one
pub fn risk_panel(history: &TimeSeries, forecast: &ForecastPanel) -> RiskPanel {
    let Some(first) = forecast.ready().and_then(|f| f.first_value()) else {
        return RiskPanel::Unavailable {
            reason: "no forecast to assess".to_string(),
        };
    };

    match GrowthRule::default().assess(history, first) {
        Ok(assessment) => RiskPanel::Assessed(assessment),
        Err(err) => {
            warn!(error = %err, "risk assessment unavailable");
            RiskPanel::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}
