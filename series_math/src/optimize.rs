//! Derivative-free minimisation
//!
//! A deterministic Nelder-Mead simplex search. Model fitting only needs a
//! handful of parameters, so the simplex stays tiny and no gradients are
//! required.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Tuning knobs for the simplex search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelderMeadOptions {
    /// Iteration cap per parameter
    pub max_iterations_per_dim: usize,
    /// Relative spread of objective values treated as converged
    pub function_tolerance: f64,
    /// Largest vertex distance from the best point treated as converged
    pub simplex_tolerance: f64,
    /// Offset applied to each coordinate when building the first simplex
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations_per_dim: 500,
            function_tolerance: 1e-10,
            simplex_tolerance: 1e-8,
            initial_step: 0.5,
        }
    }
}

/// Location and value of a minimum
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

/// Nelder-Mead minimiser
#[derive(Debug, Clone, Default)]
pub struct NelderMead {
    options: NelderMeadOptions,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    /// Create a minimiser with custom options
    pub fn new(options: NelderMeadOptions) -> Result<Self> {
        if options.max_iterations_per_dim == 0 {
            return Err(MathError::InvalidInput(
                "Iteration cap must be positive".to_string(),
            ));
        }
        if !(options.initial_step.is_finite() && options.initial_step > 0.0) {
            return Err(MathError::InvalidInput(
                "Initial step must be a positive finite number".to_string(),
            ));
        }
        if options.function_tolerance < 0.0 || options.simplex_tolerance < 0.0 {
            return Err(MathError::InvalidInput(
                "Tolerances must not be negative".to_string(),
            ));
        }

        Ok(Self { options })
    }

    /// Minimise `objective` starting from `start`
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let dim = start.len();
        let first = objective(start);
        if !first.is_finite() {
            return Err(MathError::NonFinite(
                "Objective is not finite at the starting point".to_string(),
            ));
        }
        if dim == 0 {
            return Ok(Minimum {
                point: Vec::new(),
                value: first,
                iterations: 0,
            });
        }

        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
        simplex.push((start.to_vec(), first));
        for i in 0..dim {
            let mut vertex = start.to_vec();
            vertex[i] += self.options.initial_step;
            let value = objective(&vertex);
            if !value.is_finite() {
                return Err(MathError::NonFinite(format!(
                    "Objective is not finite at initial vertex {}",
                    i + 1
                )));
            }
            simplex.push((vertex, value));
        }

        let max_iterations = self.options.max_iterations_per_dim * dim;
        // Non-finite values during the search are treated as +inf so the
        // simplex moves away from them.
        let eval = |x: &[f64]| {
            let v = objective(x);
            if v.is_finite() {
                v
            } else {
                f64::INFINITY
            }
        };

        for iteration in 0..max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            if self.converged(&simplex) {
                let (point, value) = simplex.swap_remove(0);
                return Ok(Minimum {
                    point,
                    value,
                    iterations: iteration,
                });
            }

            let centroid = centroid(&simplex[..dim]);
            let worst = simplex[dim].clone();
            let second_worst_value = simplex[dim - 1].1;
            let best_value = simplex[0].1;

            let reflected = along(&centroid, &worst.0, -REFLECTION);
            let reflected_value = eval(&reflected);

            if reflected_value < best_value {
                let expanded = along(&centroid, &worst.0, -EXPANSION);
                let expanded_value = eval(&expanded);
                simplex[dim] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < second_worst_value {
                simplex[dim] = (reflected, reflected_value);
                continue;
            }

            let (contracted, contracted_value) = if reflected_value < worst.1 {
                let outside = along(&centroid, &worst.0, -CONTRACTION * REFLECTION);
                let value = eval(&outside);
                (outside, value)
            } else {
                let inside = along(&centroid, &worst.0, CONTRACTION);
                let value = eval(&inside);
                (inside, value)
            };

            if contracted_value < worst.1.min(reflected_value) {
                simplex[dim] = (contracted, contracted_value);
                continue;
            }

            let best = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk: Vec<f64> = best
                    .iter()
                    .zip(vertex.0.iter())
                    .map(|(b, v)| b + SHRINK * (v - b))
                    .collect();
                let value = eval(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        Err(MathError::NotConverged {
            iterations: max_iterations,
        })
    }

    fn converged(&self, sorted: &[(Vec<f64>, f64)]) -> bool {
        let (best, best_value) = (&sorted[0].0, sorted[0].1);

        let value_spread = sorted[1..]
            .iter()
            .map(|(_, v)| (v - best_value).abs())
            .fold(0.0, f64::max);
        if value_spread <= self.options.function_tolerance * (1.0 + best_value.abs()) {
            return true;
        }

        let point_spread = sorted[1..]
            .iter()
            .flat_map(|(p, _)| p.iter().zip(best.iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        point_spread <= self.options.simplex_tolerance
    }
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let dim = vertices[0].0.len();
    let mut center = vec![0.0; dim];
    for (point, _) in vertices {
        for (c, p) in center.iter_mut().zip(point.iter()) {
            *c += p;
        }
    }
    let n = vertices.len() as f64;
    center.iter_mut().for_each(|c| *c /= n);
    center
}

/// `centroid + t * (point - centroid)`
fn along(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(c, p)| c + t * (p - c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_bowl() {
        let optimizer = NelderMead::default();
        let minimum = optimizer
            .minimize(|x| (x[0] - 1.5).powi(2) + 3.0 * (x[1] + 0.5).powi(2), &[0.0, 0.0])
            .unwrap();

        assert_abs_diff_eq!(minimum.point[0], 1.5, epsilon = 1e-3);
        assert_abs_diff_eq!(minimum.point[1], -0.5, epsilon = 1e-3);
        assert_abs_diff_eq!(minimum.value, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_rosenbrock() {
        let optimizer = NelderMead::new(NelderMeadOptions {
            max_iterations_per_dim: 2000,
            ..NelderMeadOptions::default()
        })
        .unwrap();
        let minimum = optimizer
            .minimize(
                |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
                &[-1.2, 1.0],
            )
            .unwrap();

        assert_abs_diff_eq!(minimum.point[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(minimum.point[1], 1.0, epsilon = 2e-2);
    }

    #[test]
    fn test_deterministic() {
        let optimizer = NelderMead::default();
        let f = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[0] * x[1]).sin().powi(2);
        let a = optimizer.minimize(f, &[0.1, 0.2]).unwrap();
        let b = optimizer.minimize(f, &[0.1, 0.2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_iteration_cap() {
        let optimizer = NelderMead::new(NelderMeadOptions {
            max_iterations_per_dim: 1,
            function_tolerance: 0.0,
            simplex_tolerance: 0.0,
            initial_step: 0.5,
        })
        .unwrap();
        let result = optimizer.minimize(|x| (x[0] - 10.0).powi(2), &[0.0]);
        assert!(matches!(result, Err(MathError::NotConverged { .. })));
    }

    #[test]
    fn test_non_finite_start() {
        let optimizer = NelderMead::default();
        let result = optimizer.minimize(|_| f64::NAN, &[0.0]);
        assert!(matches!(result, Err(MathError::NonFinite(_))));
    }

    #[test]
    fn test_invalid_options() {
        assert!(NelderMead::new(NelderMeadOptions {
            initial_step: 0.0,
            ..NelderMeadOptions::default()
        })
        .is_err());
    }
}
