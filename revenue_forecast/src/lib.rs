//! # Revenue Forecast
//!
//! Simulated quarterly revenue, ARIMA forecasting and growth risk checks.
//!
//! ## Features
//!
//! - Quarterly time series with quarter-end timestamps
//! - Synthetic revenue and operating income generators with injectable randomness
//! - ARIMA(p,d,q) fitted by conditional sum of squares, with prediction intervals
//! - Macroeconomic indicator retrieval from FRED
//! - A threshold rule flagging abnormal forecast growth
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use revenue_forecast::forecast::{forecast_revenue, Horizon};
//! use revenue_forecast::risk::GrowthRule;
//! use revenue_forecast::synthetic::{simulate_revenue, HistorySettings};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let history = simulate_revenue(&HistorySettings::default(), &mut rng)?;
//!
//! let forecast = forecast_revenue(&history, Horizon::new(4)?, 0.95)?;
//! assert_eq!(forecast.series.len(), 4);
//!
//! let first = forecast.first_value().unwrap_or_default();
//! let assessment = GrowthRule::default().assess(&history, first)?;
//! println!("{}", assessment.flag.message());
//! # Ok::<(), revenue_forecast::ForecastError>(())
//! ```

pub mod calendar;
pub mod data;
pub mod error;
pub mod forecast;
pub mod income;
pub mod indicator;
pub mod models;
pub mod risk;
pub mod synthetic;

// Re-export commonly used types
pub use crate::data::{Frequency, Observation, TimeSeries};
pub use crate::error::ForecastError;
pub use crate::forecast::{Horizon, RevenueForecast};
pub use crate::indicator::{IndicatorError, IndicatorSource};
pub use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
pub use crate::risk::{RiskAssessment, RiskFlag};
