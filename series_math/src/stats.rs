//! Descriptive statistics over plain slices

/// Arithmetic mean, `NaN` for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`), `NaN` for an empty slice
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Biased sample autocovariance at `lag` (divides by `n`, not `n - lag`)
pub fn autocovariance(values: &[f64], lag: usize) -> f64 {
    let n = values.len();
    if n == 0 || lag >= n {
        return f64::NAN;
    }
    let m = mean(values);
    values[lag..]
        .iter()
        .zip(values.iter())
        .map(|(x_t, x_lag)| (x_t - m) * (x_lag - m))
        .sum::<f64>()
        / n as f64
}
