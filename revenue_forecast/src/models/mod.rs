//! Forecasting models for time series data

use crate::data::{Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    pub(crate) values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Prediction intervals (optional)
    pub(crate) intervals: Option<Vec<(f64, f64)>>,
    /// Timestamps (optional)
    pub(crate) timestamps: Option<Vec<NaiveDate>>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ForecastingError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
            timestamps: None,
        })
    }

    /// Create a new forecast result with prediction intervals
    pub fn new_with_intervals(
        values: Vec<f64>,
        horizons: usize,
        intervals: Vec<(f64, f64)>,
    ) -> Result<Self> {
        if values.len() != intervals.len() {
            return Err(ForecastError::ForecastingError(format!(
                "Values length ({}) doesn't match intervals length ({})",
                values.len(),
                intervals.len()
            )));
        }

        let mut result = Self::new(values, horizons)?;
        result.intervals = Some(intervals);
        Ok(result)
    }

    /// Attach one timestamp per forecasted value
    pub fn with_timestamps(mut self, timestamps: Vec<NaiveDate>) -> Result<Self> {
        if timestamps.len() != self.horizons {
            return Err(ForecastError::ForecastingError(format!(
                "Timestamps length ({}) doesn't match horizons ({})",
                timestamps.len(),
                self.horizons
            )));
        }
        self.timestamps = Some(timestamps);
        Ok(self)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Get the timestamps, if available
    pub fn timestamps(&self) -> Option<&[NaiveDate]> {
        self.timestamps.as_deref()
    }

    /// Convert a timestamped forecast into a series
    pub fn to_series(&self, name: impl Into<String>, frequency: Frequency) -> Result<TimeSeries> {
        let timestamps = self.timestamps.clone().ok_or_else(|| {
            ForecastError::ForecastingError("Forecast has no timestamps".to_string())
        })?;
        TimeSeries::new(name, frequency, timestamps, self.values.clone())
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// One-step-ahead predictions over the training data
    fn fitted_values(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on time series data
    fn train(&self, data: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
