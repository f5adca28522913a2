//! # Series Math
//!
//! Numeric building blocks for the revenue outlook workspace.
//! This crate provides growth-rate calculations, basic statistics,
//! differencing and the optimiser used to fit time series models.

use thiserror::Error;

pub mod differencing;
pub mod optimize;
pub mod returns;
pub mod stats;
pub mod transform;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Non-finite value encountered: {0}")]
    NonFinite(String),

    #[error("Optimiser did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
