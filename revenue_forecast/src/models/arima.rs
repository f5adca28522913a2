//! ARIMA models for time series forecasting
//!
//! Parameters are estimated by conditional sum of squares (CSS): the
//! series is differenced `d` times, the ARMA(p, q) recursion is run with
//! pre-sample errors set to zero, and the squared one-step errors are
//! minimised with a Nelder-Mead search. Coefficients are searched through
//! transforms that keep the AR part stationary and the MA part invertible.
//!
//! A constant is only estimated when `d == 0`. The exact Gaussian likelihood is never
//! evaluated, so estimates differ slightly from a full maximum-likelihood fit.

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use serde::Serialize;
use series_math::differencing::{difference, integrate};
use series_math::optimize::{NelderMead, NelderMeadOptions};
use series_math::stats;
use series_math::transform::{constrain_invertible, constrain_stationary};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

const MAX_AR_ORDER: usize = 5;
const MAX_DIFFERENCING: usize = 2;
const MAX_MA_ORDER: usize = 5;
/// Observations required on top of `p + d + q`
const EXTRA_OBSERVATIONS: usize = 10;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// AR order (p)
    p: usize,
    /// Differencing order (d)
    d: usize,
    /// MA order (q)
    q: usize,
    /// Coverage of the prediction intervals
    confidence_level: f64,
    /// Optimiser settings
    optimizer: NelderMeadOptions,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    p: usize,
    d: usize,
    q: usize,
    confidence_level: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Mean of the working series (zero when d > 0)
    intercept: f64,
    /// Historical data on the original scale
    historical_data: Vec<f64>,
    /// Differenced, demeaned series the ARMA part was fitted to
    working: Vec<f64>,
    /// One-step errors on the working series
    residuals: Vec<f64>,
    /// Fit diagnostics
    summary: FitSummary,
}

/// Diagnostics of a fitted ARIMA model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    /// `(p, d, q)`
    pub order: (usize, usize, usize),
    pub ar_coefficients: Vec<f64>,
    pub ma_coefficients: Vec<f64>,
    /// Conditional sum of squared errors
    pub css: f64,
    /// Innovation variance estimate
    pub sigma2: f64,
    /// Gaussian conditional log-likelihood
    pub log_likelihood: f64,
    /// Akaike information criterion
    pub aic: f64,
    /// Observations entering the likelihood
    pub nobs: usize,
    /// Optimiser iterations used
    pub iterations: usize,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        if p > MAX_AR_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "AR order must be <= {}, got {}",
                MAX_AR_ORDER, p
            )));
        }
        if d > MAX_DIFFERENCING {
            return Err(ForecastError::InvalidParameter(format!(
                "Differencing order must be <= {}, got {}",
                MAX_DIFFERENCING, d
            )));
        }
        if q > MAX_MA_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "MA order must be <= {}, got {}",
                MAX_MA_ORDER, q
            )));
        }

        Ok(Self {
            name: format!("ARIMA({},{},{})", p, d, q),
            p,
            d,
            q,
            confidence_level: 0.95,
            optimizer: NelderMeadOptions::default(),
        })
    }

    /// Set the coverage of the prediction intervals
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }
        self.confidence_level = level;
        Ok(self)
    }

    /// `(p, d, q)`
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// Smallest history the model will accept
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + EXTRA_OBSERVATIONS
    }

    fn split_params(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        (
            constrain_stationary(&params[..self.p]),
            constrain_invertible(&params[self.p..]),
        )
    }
}

/// One-step errors of an ARMA recursion with zero pre-sample errors
fn css_residuals(series: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let p = ar.len();
    let mut residuals = vec![0.0; series.len()];

    for t in p..series.len() {
        let mut prediction = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            prediction += phi * series[t - 1 - i];
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                prediction += theta * residuals[t - 1 - j];
            }
        }
        residuals[t] = series[t] - prediction;
    }

    residuals
}

fn sum_of_squares(residuals: &[f64], skip: usize) -> f64 {
    residuals.iter().skip(skip).map(|e| e * e).sum()
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &TimeSeries) -> Result<TrainedArimaModel> {
        let values = data.values();
        if !stats::all_finite(&values) {
            return Err(ForecastError::InvalidData(
                "Series contains NaN or infinite values".to_string(),
            ));
        }
        if values.len() < self.min_observations() {
            return Err(ForecastError::InsufficientData {
                required: self.min_observations(),
                actual: values.len(),
            });
        }

        let differenced = difference(&values, self.d);
        let variance = stats::variance(&differenced)?;
        let scale = differenced.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if variance <= 1e-12 * (1.0 + scale * scale) {
            return Err(ForecastError::DegenerateSeries(format!(
                "{} has no variation after differencing {} time(s)",
                data.name(),
                self.d
            )));
        }

        let intercept = if self.d == 0 {
            stats::mean(&differenced)?
        } else {
            0.0
        };
        let working: Vec<f64> = differenced.iter().map(|v| v - intercept).collect();

        let objective = |params: &[f64]| {
            let (ar, ma) = self.split_params(params);
            sum_of_squares(&css_residuals(&working, &ar, &ma), self.p)
        };
        let optimizer = NelderMead::new(self.optimizer)?;
        let minimum = optimizer.minimize(objective, &vec![0.0; self.p + self.q])?;

        let (ar_coefficients, ma_coefficients) = self.split_params(&minimum.point);
        let residuals = css_residuals(&working, &ar_coefficients, &ma_coefficients);
        let css = sum_of_squares(&residuals, self.p);
        let nobs = working.len() - self.p;
        let sigma2 = css / nobs as f64;
        if !(sigma2.is_finite() && sigma2 > 0.0) {
            return Err(ForecastError::ConvergenceFailure(format!(
                "innovation variance estimate is {}",
                sigma2
            )));
        }

        let log_likelihood =
            -0.5 * nobs as f64 * ((2.0 * std::f64::consts::PI * sigma2).ln() + 1.0);
        let k = self.p + self.q + 1 + usize::from(self.d == 0);
        let aic = -2.0 * log_likelihood + 2.0 * k as f64;

        debug!(
            model = %self.name,
            ar = ?ar_coefficients,
            ma = ?ma_coefficients,
            sigma2,
            iterations = minimum.iterations,
            "fitted ARIMA"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            p: self.p,
            d: self.d,
            q: self.q,
            confidence_level: self.confidence_level,
            summary: FitSummary {
                order: (self.p, self.d, self.q),
                ar_coefficients: ar_coefficients.clone(),
                ma_coefficients: ma_coefficients.clone(),
                css,
                sigma2,
                log_likelihood,
                aic,
                nobs,
                iterations: minimum.iterations,
            },
            ar_coefficients,
            ma_coefficients,
            intercept,
            historical_data: values,
            working,
            residuals,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Fit diagnostics
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    /// Fitted AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Fitted MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Point forecasts on the differenced scale
    fn forecast_working(&self, horizon: usize) -> Vec<f64> {
        let mut series = self.working.clone();
        let mut errors = self.residuals.clone();

        for _ in 0..horizon {
            let n = series.len();
            let mut forecast = 0.0;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                forecast += phi * series[n - 1 - i];
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if n > j {
                    forecast += theta * errors[n - 1 - j];
                }
            }
            series.push(forecast);
            // Future shocks have zero expectation
            errors.push(0.0);
        }

        series
            .split_off(self.working.len())
            .into_iter()
            .map(|v| v + self.intercept)
            .collect()
    }

    /// MA(infinity) weights of the integrated process
    fn psi_weights(&self, horizon: usize) -> Vec<f64> {
        let mut psi = vec![0.0; horizon];
        if horizon == 0 {
            return psi;
        }
        psi[0] = 1.0;
        for j in 1..horizon {
            let mut weight = if j <= self.q {
                self.ma_coefficients[j - 1]
            } else {
                0.0
            };
            for i in 1..=j.min(self.p) {
                weight += self.ar_coefficients[i - 1] * psi[j - i];
            }
            psi[j] = weight;
        }

        for _ in 0..self.d {
            let mut running = 0.0;
            for weight in psi.iter_mut() {
                running += *weight;
                *weight = running;
            }
        }

        psi
    }

    fn prediction_intervals(&self, values: &[f64]) -> Result<Vec<(f64, f64)>> {
        let normal = Normal::new(0.0, 1.0).map_err(|e| ForecastError::MathError(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.confidence_level / 2.0);
        let psi = self.psi_weights(values.len());

        let mut cumulative = 0.0;
        Ok(values
            .iter()
            .zip(psi.iter())
            .map(|(value, weight)| {
                cumulative += weight * weight;
                let margin = z * (self.summary.sigma2 * cumulative).sqrt();
                (value - margin, value + margin)
            })
            .collect())
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        let working = self.forecast_working(horizon);
        let values = integrate(&working, &self.historical_data, self.d)?;
        if !stats::all_finite(&values) {
            return Err(ForecastError::ForecastingError(
                "Forecast produced non-finite values".to_string(),
            ));
        }

        let intervals = self.prediction_intervals(&values)?;
        ForecastResult::new_with_intervals(values, horizon, intervals)
    }

    fn fitted_values(&self) -> Vec<f64> {
        // y_t - e_t is the one-step prediction of y_t on any differencing level
        self.historical_data
            .iter()
            .enumerate()
            .map(|(t, actual)| {
                if t < self.d {
                    *actual
                } else {
                    actual - self.residuals[t - self.d]
                }
            })
            .collect()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
