//! Metrics for evaluating forecast performance
//!
//! The comparison window pairs the **last** `k` observed values with the
//! **first** `k` forecast values, where `k = min(observed, forecast)`. This
//! is not a hold-out backtest; it reproduces the long-standing behaviour of
//! the tool so reported numbers stay comparable.

use serde::Serialize;
use std::fmt;

/// Forecast error metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Mean Absolute Percentage Error, in percent
    pub mape: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Number of compared pairs
    pub compared: usize,
}

/// Metrics over the overlapping tail, or `None` when nothing overlaps
///
/// A zero actual value makes MAPE infinite or NaN; it is not guarded.
pub fn tail_overlap_metrics(observed: &[f64], forecast: &[f64]) -> Option<ErrorMetrics> {
    let k = observed.len().min(forecast.len());
    if k == 0 {
        return None;
    }

    let actual = &observed[observed.len() - k..];
    let predicted = &forecast[..k];

    Some(ErrorMetrics {
        mape: mean_absolute_percentage_error(actual, predicted),
        mae: mean_absolute_error(actual, predicted),
        mse: mean_squared_error(actual, predicted),
        rmse: root_mean_squared_error(actual, predicted),
        compared: k,
    })
}

/// Mean absolute error; `NaN` for empty or mismatched inputs
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_of(actual, predicted, |a, p| (a - p).abs())
}

/// Mean squared error; `NaN` for empty or mismatched inputs
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_of(actual, predicted, |a, p| (a - p).powi(2))
}

/// Square root of the mean squared error
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

/// Mean of `|(a - p) / a|` times 100
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    mean_of(actual, predicted, |a, p| ((a - p) / a).abs()) * 100.0
}

fn mean_of<F: Fn(f64, f64) -> f64>(actual: &[f64], predicted: &[f64], term: F) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(&a, &p)| term(a, p))
        .sum::<f64>()
        / actual.len() as f64
}

impl fmt::Display for ErrorMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean Absolute Percentage Error (MAPE): {:.2}%", self.mape)?;
        writeln!(f, "Mean Absolute Error (MAE): {:.2}", self.mae)?;
        writeln!(f, "Mean Squared Error (MSE): {:.2}", self.mse)?;
        write!(f, "Root Mean Squared Error (RMSE): {:.2}", self.rmse)
    }
}
