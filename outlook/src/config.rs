//! Dashboard configuration
//!
//! Only presentation and provider settings live here. The history shape,
//! margin range, growth rule and interval coverage are fixed by the
//! pipeline. Every field has a default, so an empty TOML file (or none at
//! all) reproduces the stock dashboard.
//!
//! ```toml
//! company = "Starbucks"
//!
//! [indicator]
//! enabled = true
//! series_id = "CPIAUCSL"
//! start = "2018-01-01"
//! base_url = "https://fred.stlouisfed.org"
//! ```

use crate::error::{OutlookError, Result};
use chrono::NaiveDate;
use revenue_forecast::indicator::{IndicatorRequest, CPI_SERIES_ID, FRED_BASE_URL};
use revenue_forecast::Frequency;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the macroeconomic overlay comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorSettings {
    /// Skip the network fetch entirely when false
    pub enabled: bool,
    pub series_id: String,
    /// Start of the window; the end is always the run date
    pub start: NaiveDate,
    pub base_url: String,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            series_id: CPI_SERIES_ID.to_string(),
            start: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            base_url: FRED_BASE_URL.to_string(),
        }
    }
}

impl IndicatorSettings {
    /// Request covering `start..=today`
    pub fn request(&self, today: NaiveDate) -> IndicatorRequest {
        IndicatorRequest {
            series_id: self.series_id.clone(),
            start: self.start,
            end: today,
            frequency: Frequency::Monthly,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Company named in headings and the summary
    pub company: String,
    pub indicator: IndicatorSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            company: "Starbucks".to_string(),
            indicator: IndicatorSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        if self.company.trim().is_empty() {
            return Err(OutlookError::Config("company must not be empty".to_string()));
        }
        if self.indicator.enabled && self.indicator.series_id.trim().is_empty() {
            return Err(OutlookError::Config(
                "indicator.series_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
