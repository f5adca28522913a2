//! Error types for the dashboard

use revenue_forecast::{ForecastError, IndicatorError};
use thiserror::Error;

/// Failures that abort a dashboard run
#[derive(Debug, Error)]
pub enum OutlookError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error("Could not serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, OutlookError>;
