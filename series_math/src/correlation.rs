//! Sample autocorrelation and partial autocorrelation
//!
//! Both functions use the biased autocovariance estimator (divide by `n`), so
//! the partial autocorrelations are the Yule-Walker "ywm" estimates obtained
//! through the Durbin-Levinson recursion.

use crate::stats::autocovariance;
use crate::{MathError, Result};

/// Default number of ACF lags for a series of length `n`: `min(10·log10(n), n - 1)`
pub fn default_acf_lags(n: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let by_log = (10.0 * (n as f64).log10()).floor() as usize;
    by_log.min(n - 1)
}

/// Default number of PACF lags for a series of length `n`: `min(10·log10(n), n/2 - 1)`
pub fn default_pacf_lags(n: usize) -> usize {
    if n < 4 {
        return 0;
    }
    let by_log = (10.0 * (n as f64).log10()).floor() as usize;
    by_log.min(n / 2 - 1)
}

/// Autocorrelations for lags `0..=nlags`
///
/// The value at lag 0 is always 1. A constant series has zero autocovariance
/// and is rejected.
pub fn acf(series: &[f64], nlags: usize) -> Result<Vec<f64>> {
    if series.len() < 2 {
        return Err(MathError::InsufficientData(format!(
            "Autocorrelation needs at least 2 values, got {}",
            series.len()
        )));
    }
    if nlags >= series.len() {
        return Err(MathError::InvalidInput(format!(
            "Cannot compute {} lags for a series of {} values",
            nlags,
            series.len()
        )));
    }

    let gamma0 = autocovariance(series, 0);
    if gamma0.abs() < f64::EPSILON {
        return Err(MathError::CalculationError(
            "Series has zero variance".to_string(),
        ));
    }

    Ok((0..=nlags)
        .map(|lag| autocovariance(series, lag) / gamma0)
        .collect())
}

/// Partial autocorrelations for lags `0..=nlags` (Yule-Walker, biased autocovariance)
pub fn pacf_ywm(series: &[f64], nlags: usize) -> Result<Vec<f64>> {
    let rho = acf(series, nlags)?;

    let mut pacf = Vec::with_capacity(nlags + 1);
    pacf.push(1.0);
    if nlags == 0 {
        return Ok(pacf);
    }

    // phi holds the AR(k-1) Yule-Walker coefficients, 1-based
    let mut phi = vec![0.0; nlags + 1];
    let mut sigma = 1.0 - rho[1] * rho[1];
    phi[1] = rho[1];
    pacf.push(rho[1]);

    for k in 2..=nlags {
        if sigma.abs() < 1e-12 {
            return Err(MathError::CalculationError(format!(
                "Durbin-Levinson recursion is singular at lag {}",
                k
            )));
        }

        let num = rho[k] - (1..k).map(|j| phi[j] * rho[k - j]).sum::<f64>();
        let phi_kk = num / sigma;

        let previous = phi.clone();
        for j in 1..k {
            phi[j] = previous[j] - phi_kk * previous[k - j];
        }
        phi[k] = phi_kk;
        sigma *= 1.0 - phi_kk * phi_kk;

        pacf.push(phi_kk);
    }

    Ok(pacf)
}

/// Bartlett standard errors for autocorrelations of a series of length `n`
///
/// `se[k] = sqrt((1 + 2·Σ_{j<k} r_j²) / n)` for `k >= 1`; lag 0 gets 0.
pub fn bartlett_standard_errors(acf: &[f64], n: usize) -> Vec<f64> {
    if acf.is_empty() || n == 0 {
        return Vec::new();
    }

    let mut errors = Vec::with_capacity(acf.len());
    errors.push(0.0);
    let mut cumulative = 0.0;
    for k in 1..acf.len() {
        if k > 1 {
            cumulative += acf[k - 1] * acf[k - 1];
        }
        errors.push(((1.0 + 2.0 * cumulative) / n as f64).sqrt());
    }
    errors
}
