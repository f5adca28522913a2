//! Error types for the revenue_forecast crate

use series_math::MathError;
use thiserror::Error;

/// Custom error types for the revenue_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Input contains values the model cannot use (NaN, infinity)
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Not enough observations for the requested model
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Series carries no information the model can fit (e.g. constant)
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    /// Parameter estimation did not converge
    #[error("Model failed to converge: {0}")]
    ConvergenceFailure(String),

    /// Error related to forecasting operations
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::NotConverged { iterations } => ForecastError::ConvergenceFailure(format!(
                "optimiser stopped after {} iterations",
                iterations
            )),
            MathError::NonFinite(msg) => ForecastError::InvalidData(msg),
            other => ForecastError::MathError(other.to_string()),
        }
    }
}

impl ForecastError {
    /// True when the error means "no forecast can be produced from this history"
    /// rather than a programming or configuration mistake
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            ForecastError::InvalidData(_)
                | ForecastError::InsufficientData { .. }
                | ForecastError::DegenerateSeries(_)
                | ForecastError::ConvergenceFailure(_)
        )
    }
}
