//! Bounded Nelder-Mead simplex minimisation
//!
//! Used for conditional-sum-of-squares estimation, where the objective can
//! span many orders of magnitude (tourist counts in the millions), so the
//! convergence test is relative to the best objective value.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Tuning knobs for [`nelder_mead`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations
    pub max_iter: usize,
    /// Relative spread of objective values at which the simplex has converged
    pub tolerance: f64,
    /// Reflection coefficient
    pub alpha: f64,
    /// Expansion coefficient
    pub gamma: f64,
    /// Contraction coefficient
    pub rho: f64,
    /// Shrink coefficient
    pub sigma: f64,
    /// Initial simplex step, relative to the coordinate (absolute when it is zero)
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-10,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone, Serialize)]
pub struct NelderMeadResult {
    /// Best point found
    pub optimal_point: Vec<f64>,
    /// Objective value at the best point
    pub optimal_value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the convergence test was met before `max_iter`
    pub converged: bool,
}

/// Minimise `objective` starting from `initial`
///
/// Points are clamped into `bounds` (one `(min, max)` pair per coordinate)
/// whenever bounds are given.
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> Result<NelderMeadResult>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::InvalidInput(
            "Cannot optimise over zero parameters".to_string(),
        ));
    }
    if let Some(b) = bounds {
        if b.len() != n {
            return Err(MathError::InvalidInput(format!(
                "Expected {} bounds, got {}",
                n,
                b.len()
            )));
        }
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(clamp(initial, bounds));
    for i in 0..n {
        let mut vertex = initial.to_vec();
        let step = if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        simplex.push(clamp(&vertex, bounds));
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| sanitize(objective(v))).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        let spread = values[worst] - values[best];
        if spread <= config.tolerance * (values[best].abs() + config.tolerance)
            || diameter(&simplex, best) <= config.tolerance.sqrt()
        {
            converged = true;
            break;
        }

        let centroid = centroid(&simplex, worst);

        let reflected = clamp(&towards(&centroid, &simplex[worst], -config.alpha), bounds);
        let reflected_value = sanitize(objective(&reflected));

        if reflected_value < values[best] {
            let expanded = clamp(&towards(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = sanitize(objective(&expanded));
            if expanded_value < reflected_value {
                simplex[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            simplex[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        let (contracted, contracted_value) = if reflected_value < values[worst] {
            let point = clamp(&towards(&centroid, &reflected, config.rho), bounds);
            let value = sanitize(objective(&point));
            (point, value)
        } else {
            let point = clamp(&towards(&centroid, &simplex[worst], config.rho), bounds);
            let value = sanitize(objective(&point));
            (point, value)
        };

        if contracted_value < values[worst].min(reflected_value) {
            simplex[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let anchor = simplex[best].clone();
        for i in 0..=n {
            if i == best {
                continue;
            }
            simplex[i] = clamp(&towards(&anchor, &simplex[i], config.sigma), bounds);
            values[i] = sanitize(objective(&simplex[i]));
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal))
        .unwrap_or(0);

    Ok(NelderMeadResult {
        optimal_point: simplex[best].clone(),
        optimal_value: values[best],
        iterations,
        converged,
    })
}

/// `from + factor·(to - from)`; a negative factor reflects `to` through `from`
fn towards(from: &[f64], to: &[f64], factor: f64) -> Vec<f64> {
    from.iter()
        .zip(to.iter())
        .map(|(f, t)| f + factor * (t - f))
        .collect()
}

fn centroid(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dims = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut center = vec![0.0; dims];
    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, v) in center.iter_mut().zip(vertex.iter()) {
            *c += v;
        }
    }
    center.iter_mut().for_each(|c| *c /= count);
    center
}

/// Largest relative distance from the best vertex to any other vertex
fn diameter(simplex: &[Vec<f64>], best: usize) -> f64 {
    let anchor = &simplex[best];
    let scale = 1.0 + anchor.iter().map(|x| x * x).sum::<f64>().sqrt();
    simplex
        .iter()
        .map(|v| {
            v.iter()
                .zip(anchor.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max)
        / scale
}

fn clamp(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .zip(b.iter())
            .map(|(&x, &(lo, hi))| x.clamp(lo, hi))
            .collect(),
    }
}

// NaN would poison every comparison in the simplex ordering
fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}
