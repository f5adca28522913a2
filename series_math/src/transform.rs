//! Parameter transforms that keep ARMA coefficients admissible
//!
//! Optimisers work on unconstrained reals. Each value is squashed to a
//! partial autocorrelation in (-1, 1) and the Durbin-Levinson recursion
//! turns those into coefficients of a stationary AR polynomial.

/// Map unconstrained reals to stationary AR coefficients (`y_t = sum phi_i y_{t-i}`)
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partials: Vec<f64> = unconstrained.iter().map(|x| x.tanh()).collect();
    let mut coefficients = vec![0.0; partials.len()];

    for k in 0..partials.len() {
        let previous = coefficients.clone();
        coefficients[k] = partials[k];
        for j in 0..k {
            coefficients[j] = previous[j] - partials[k] * previous[k - 1 - j];
        }
    }

    coefficients
}

/// Map unconstrained reals to invertible MA coefficients (`e_t + sum theta_j e_{t-j}`)
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}
