//! Differencing and its inverse

use crate::{MathError, Result};

/// Apply `order` rounds of first differencing
pub fn difference(values: &[f64], order: usize) -> Vec<f64> {
    let mut result = values.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `order` rounds of differencing for values that continue `history`.
///
/// `forecasts` are on the differenced scale and follow directly after the
/// last element of `history`; the result is on the original scale.
pub fn integrate(forecasts: &[f64], history: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(forecasts.to_vec());
    }
    if history.len() < order {
        return Err(MathError::InsufficientData(format!(
            "Integrating order {} needs at least {} history values",
            order, order
        )));
    }

    // Last value of each differencing level, from the raw series upwards
    let mut anchors = Vec::with_capacity(order);
    let mut level = history.to_vec();
    for _ in 0..order {
        if let Some(last) = level.last() {
            anchors.push(*last);
        }
        level = difference(&level, 1);
    }

    let mut result = forecasts.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    Ok(result)
}
