//! # Outlook
//!
//! A quarterly revenue outlook dashboard. One run simulates a revenue
//! history, projects it with ARIMA(1,1,1), overlays CPI from FRED,
//! derives operating income and flags abnormal forecast growth.
//!
//! ## Example
//!
//! ```no_run
//! use chrono::Local;
//! use outlook::config::DashboardConfig;
//! use outlook::{pipeline, report};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use revenue_forecast::indicator::FredClient;
//! use revenue_forecast::Horizon;
//!
//! let config = DashboardConfig::default();
//! let client = FredClient::with_base_url(&config.indicator.base_url)?;
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let dashboard = pipeline::run(
//!     &config,
//!     Horizon::new(4)?,
//!     Local::now().date_naive(),
//!     &mut rng,
//!     &client,
//! )?;
//! report::render(&dashboard, &mut std::io::stdout())?;
//! # Ok::<(), outlook::OutlookError>(())
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod summary;

pub use crate::config::DashboardConfig;
pub use crate::error::OutlookError;
pub use crate::pipeline::{Dashboard, ForecastPanel, IndicatorPanel, RiskPanel};
