//! Period-over-period growth calculations

use crate::{MathError, Result};

/// Relative change between adjacent values (`v[i] / v[i - 1] - 1`).
///
/// Returns one element fewer than the input. A zero denominator yields a
/// non-finite element, which callers are expected to check.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    if values.len() < 2 {
        return Vec::new();
    }

    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Mean of the period-over-period percentage changes of a series
pub fn mean_pct_change(values: &[f64]) -> Result<f64> {
    if values.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Need at least 2 values to compute growth, got {}",
            values.len()
        )));
    }

    let changes = pct_change(values);
    Ok(changes.iter().sum::<f64>() / changes.len() as f64)
}

/// Relative change from `from` to `to`
pub fn growth_between(from: f64, to: f64) -> f64 {
    (to - from) / from
}
