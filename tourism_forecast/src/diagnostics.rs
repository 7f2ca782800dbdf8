//! Residual diagnostics: autocorrelation and partial autocorrelation

use crate::error::Result;
use serde::Serialize;
use series_math::{acf, bartlett_standard_errors, default_acf_lags, default_pacf_lags, pacf_ywm, MathError};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;

/// Which correlation function a correlogram holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrelationKind {
    Acf,
    Pacf,
}

impl fmt::Display for CorrelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationKind::Acf => write!(f, "Autocorrelation"),
            CorrelationKind::Pacf => write!(f, "Partial Autocorrelation"),
        }
    }
}

/// Correlation per lag with a 95% band around zero
#[derive(Debug, Clone, Serialize)]
pub struct Correlogram {
    pub kind: CorrelationKind,
    /// Correlation at lags `0..values.len()`
    pub values: Vec<f64>,
    /// Half-width of the confidence band per lag (0 at lag 0)
    pub band: Vec<f64>,
    /// Length of the series the correlogram was computed from
    pub n: usize,
}

impl Correlogram {
    /// Highest lag shown
    pub fn max_lag(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Lags whose correlation falls outside the band
    pub fn significant_lags(&self) -> Vec<usize> {
        self.values
            .iter()
            .zip(self.band.iter())
            .enumerate()
            .skip(1)
            .filter(|(_, (v, b))| v.abs() > **b)
            .map(|(lag, _)| lag)
            .collect()
    }
}

fn z_95() -> f64 {
    Normal::new(0.0, 1.0)
        .map(|n| n.inverse_cdf(0.975))
        .unwrap_or(1.96)
}

/// Autocorrelation of the residuals with Bartlett bands
pub fn residual_acf(residuals: &[f64]) -> Result<Correlogram> {
    let n = residuals.len();
    let nlags = default_acf_lags(n);
    let values = degrade_flat(acf(residuals, nlags), nlags)?;

    let z = z_95();
    let band = bartlett_standard_errors(&values, n)
        .into_iter()
        .map(|se| z * se)
        .collect();

    Ok(Correlogram {
        kind: CorrelationKind::Acf,
        values,
        band,
        n,
    })
}

/// Partial autocorrelation of the residuals ("ywm") with `z/√n` bands
pub fn residual_pacf(residuals: &[f64]) -> Result<Correlogram> {
    let n = residuals.len();
    let nlags = default_pacf_lags(n);
    let values = degrade_flat(pacf_ywm(residuals, nlags), nlags)?;

    let half_width = if n > 0 { z_95() / (n as f64).sqrt() } else { f64::NAN };
    let band = (0..values.len())
        .map(|lag| if lag == 0 { 0.0 } else { half_width })
        .collect();

    Ok(Correlogram {
        kind: CorrelationKind::Pacf,
        values,
        band,
        n,
    })
}

// Residuals without variation have undefined correlations; show them as NaN
fn degrade_flat(values: series_math::Result<Vec<f64>>, nlags: usize) -> Result<Vec<f64>> {
    match values {
        Ok(values) => Ok(values),
        Err(MathError::CalculationError(reason)) | Err(MathError::InsufficientData(reason)) => {
            log::warn!("Residual correlations undefined: {}", reason);
            let mut flat = vec![f64::NAN; nlags + 1];
            flat[0] = 1.0;
            Ok(flat)
        }
        Err(other) => Err(other.into()),
    }
}
