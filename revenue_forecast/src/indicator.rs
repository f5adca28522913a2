//! Macroeconomic indicator retrieval
//!
//! Series are read from the public FRED graph CSV endpoint, which needs
//! no API key. A request is attempted exactly once; callers get either the
//! whole series or an [`IndicatorError`] naming what went wrong.

use crate::data::{Frequency, Observation, TimeSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Default FRED host
pub const FRED_BASE_URL: &str = "https://fred.stlouisfed.org";
/// Consumer price index, all urban consumers, seasonally adjusted
pub const CPI_SERIES_ID: &str = "CPIAUCSL";

/// Why an indicator could not be loaded
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// The provider did not answer in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The provider could not be reached
    #[error("Connection failed: {0}")]
    Connectivity(String),

    /// The provider answered with an error status
    #[error("Provider returned HTTP {status}: {body}")]
    Provider { status: u16, body: String },

    /// The provider answered but the payload could not be read
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl IndicatorError {
    /// Short machine-readable failure category
    pub fn category(&self) -> &'static str {
        match self {
            IndicatorError::Timeout(_) => "timeout",
            IndicatorError::Connectivity(_) => "connectivity",
            IndicatorError::Provider { .. } => "provider",
            IndicatorError::Malformed(_) => "malformed",
        }
    }

    /// Message suitable for the dashboard in place of the chart
    pub fn notice(&self) -> &'static str {
        match self {
            IndicatorError::Timeout(_) | IndicatorError::Connectivity(_) => {
                "Indicator data could not be loaded. Please check your internet connection."
            }
            IndicatorError::Provider { .. } => {
                "The data provider reported an error. Indicator data is unavailable right now."
            }
            IndicatorError::Malformed(_) => {
                "The data provider sent data that could not be read. Indicator data is unavailable."
            }
        }
    }
}

impl From<reqwest::Error> for IndicatorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IndicatorError::Timeout(err.to_string())
        } else if err.is_decode() || err.is_body() {
            IndicatorError::Malformed(err.to_string())
        } else {
            IndicatorError::Connectivity(err.to_string())
        }
    }
}

/// Which series to fetch and over what window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    /// Provider series identifier
    pub series_id: String,
    /// First date of the window
    pub start: NaiveDate,
    /// Last date of the window
    pub end: NaiveDate,
    /// Native frequency of the series
    pub frequency: Frequency,
}

impl IndicatorRequest {
    /// Monthly CPI from `start` up to `end`
    pub fn cpi(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            series_id: CPI_SERIES_ID.to_string(),
            start,
            end,
            frequency: Frequency::Monthly,
        }
    }
}

/// Anything that can supply an indicator series
pub trait IndicatorSource {
    /// Fetch the requested series
    fn fetch(&self, request: &IndicatorRequest) -> Result<TimeSeries, IndicatorError>;
}

/// Blocking client for the FRED graph CSV endpoint
#[derive(Debug, Clone)]
pub struct FredClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl FredClient {
    /// Client pointed at a custom host
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, IndicatorError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl IndicatorSource for FredClient {
    fn fetch(&self, request: &IndicatorRequest) -> Result<TimeSeries, IndicatorError> {
        let url = format!("{}/graph/fredgraph.csv", self.base_url);
        let start = request.start.format("%Y-%m-%d").to_string();
        let end = request.end.format("%Y-%m-%d").to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("id", request.series_id.as_str()),
                ("cosd", start.as_str()),
                ("coed", end.as_str()),
            ])
            .send()
            .map_err(|e| {
                warn!(series = %request.series_id, error = %e, "indicator request failed");
                IndicatorError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(series = %request.series_id, status = status.as_u16(), "indicator provider error");
            return Err(IndicatorError::Provider {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = response.text()?;
        let series = parse_fred_csv(&body, request)?;
        info!(
            series = %request.series_id,
            observations = series.len(),
            "indicator loaded"
        );
        Ok(series)
    }
}

/// Parse a FRED graph CSV body into a series restricted to the request window.
///
/// The first column holds ISO dates, the second the values. FRED marks
/// missing observations with `.`; those rows are skipped.
pub fn parse_fred_csv(body: &str, request: &IndicatorRequest) -> Result<TimeSeries, IndicatorError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IndicatorError::Malformed(format!("unreadable header: {}", e)))?
        .clone();
    if headers.len() != 2 {
        return Err(IndicatorError::Malformed(format!(
            "expected 2 columns, found {}",
            headers.len()
        )));
    }
    if !headers[1].eq_ignore_ascii_case(&request.series_id) {
        return Err(IndicatorError::Malformed(format!(
            "expected column '{}', found '{}'",
            request.series_id, &headers[1]
        )));
    }

    let mut points = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| IndicatorError::Malformed(format!("row {}: {}", line + 1, e)))?;
        let raw_date = record.get(0).unwrap_or_default();
        let raw_value = record.get(1).unwrap_or_default();

        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|e| {
            IndicatorError::Malformed(format!("row {}: bad date '{}': {}", line + 1, raw_date, e))
        })?;
        if date < request.start || date > request.end {
            continue;
        }
        if raw_value == "." || raw_value.is_empty() {
            continue;
        }
        let value: f64 = raw_value.parse().map_err(|e| {
            IndicatorError::Malformed(format!("row {}: bad value '{}': {}", line + 1, raw_value, e))
        })?;

        points.push(Observation { date, value });
    }

    if points.is_empty() {
        return Err(IndicatorError::Malformed(format!(
            "no observations for {} between {} and {}",
            request.series_id, request.start, request.end
        )));
    }

    TimeSeries::from_observations(request.series_id.clone(), request.frequency, points)
        .map_err(|e| IndicatorError::Malformed(e.to_string()))
}
