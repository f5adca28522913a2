//! Time series data handling

use crate::calendar;
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use series_math::returns;

/// Sampling frequency of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
}

/// A single dated value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered series of dated observations.
///
/// Dates are unique and strictly increasing, values are finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    name: String,
    frequency: Frequency,
    points: Vec<Observation>,
}

impl TimeSeries {
    /// Create a new series from parallel date and value vectors
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DataError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        let points = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| Observation { date, value })
            .collect();

        Self::from_observations(name, frequency, points)
    }

    /// Create a new series from observations
    pub fn from_observations(
        name: impl Into<String>,
        frequency: Frequency,
        points: Vec<Observation>,
    ) -> Result<Self> {
        let name = name.into();

        if let Some(bad) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(ForecastError::InvalidData(format!(
                "Series '{}' has a non-finite value at {}",
                name, bad.date
            )));
        }

        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(ForecastError::DataError(format!(
                "Series '{}' dates must be strictly increasing ({} then {})",
                name, pair[0].date, pair[1].date
            )));
        }

        Ok(Self {
            name,
            frequency,
            points,
        })
    }

    /// Series name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sampling frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// All observations in date order
    pub fn observations(&self) -> &[Observation] {
        &self.points
    }

    /// Observation dates
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Observation values
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// First observation, if any
    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    /// Last observation, if any
    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Smallest and largest value
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Period-over-period percentage change
    pub fn pct_change(&self) -> Vec<f64> {
        returns::pct_change(&self.values())
    }

    /// Mean period-over-period percentage change across the whole series
    pub fn mean_growth(&self) -> Result<f64> {
        Ok(returns::mean_pct_change(&self.values())?)
    }

    /// Same dates, values produced by `f(date, value)`
    pub fn map_values<F>(&self, name: impl Into<String>, mut f: F) -> Result<Self>
    where
        F: FnMut(NaiveDate, f64) -> f64,
    {
        let points = self
            .points
            .iter()
            .map(|p| Observation {
                date: p.date,
                value: f(p.date, p.value),
            })
            .collect();

        Self::from_observations(name, self.frequency, points)
    }

    /// Average monthly observations into quarter-end buckets.
    ///
    /// Quarterly series are returned unchanged.
    pub fn to_quarterly_mean(&self) -> Result<Self> {
        if self.frequency == Frequency::Quarterly {
            return Ok(self.clone());
        }

        let mut buckets: Vec<(NaiveDate, f64, usize)> = Vec::new();
        for point in &self.points {
            let end = calendar::quarter_end(point.date)?;
            match buckets.last_mut() {
                Some((date, sum, count)) if *date == end => {
                    *sum += point.value;
                    *count += 1;
                }
                _ => buckets.push((end, point.value, 1)),
            }
        }

        let points = buckets
            .into_iter()
            .map(|(date, sum, count)| Observation {
                date,
                value: sum / count as f64,
            })
            .collect();

        Self::from_observations(self.name.clone(), Frequency::Quarterly, points)
    }
}
