//! ARIMA models for time series forecasting
//!
//! Parameters are estimated by minimising the conditional sum of squares of
//! the one-step errors of the differenced series. A constant is estimated only
//! when the series is not differenced (`d = 0`).

use crate::error::{ForecastError, Result};
use crate::models::{CoefficientEstimate, ForecastModel, ModelSummary, TrainedForecastModel};
use series_math::{difference, integrate, nelder_mead, NelderMeadConfig};
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;
use std::fmt;

/// Largest accepted AR order
pub const MAX_P: usize = 6;
/// Largest accepted differencing order
pub const MAX_D: usize = 5;
/// Largest accepted MA order
pub const MAX_Q: usize = 10;

/// Bound on each AR and MA coefficient during estimation
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA order `(p, d, q)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    /// Create an order, checking each component against its range
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        for (name, value, max) in [("p", p, MAX_P), ("d", d, MAX_D), ("q", q, MAX_Q)] {
            if value > max {
                return Err(ForecastError::InvalidParameter(format!(
                    "{} must be between 0 and {}, got {}",
                    name, max, value
                )));
            }
        }
        Ok(Self { p, d, q })
    }

    /// Whether a constant term is estimated
    pub fn has_constant(&self) -> bool {
        self.d == 0
    }

    /// Number of mean-equation parameters (constant + AR + MA)
    pub fn num_params(&self) -> usize {
        usize::from(self.has_constant()) + self.p + self.q
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.d, self.q)
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
    /// Optimiser settings
    config: NelderMeadConfig,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Model order
    order: ArimaOrder,
    /// Mean of the differenced series (0 without a constant)
    constant: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Training series on the original scale
    historical_data: Vec<f64>,
    /// Differenced training series
    differenced: Vec<f64>,
    /// One-step errors on the differenced scale, one per differenced value
    all_residuals: Vec<f64>,
    /// Number of leading values used only as lags
    burn_in: usize,
    /// Residual variance
    sigma2: f64,
    /// Standard errors of `[constant?, ar.., ma..]`
    std_errors: Vec<f64>,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: format!("ARIMA{}", order),
            order,
            config: NelderMeadConfig {
                max_iter: 5000,
                ..NelderMeadConfig::default()
            },
        }
    }

    /// Get the model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    fn estimate(&self, z: &[f64]) -> Result<Vec<f64>> {
        let ArimaOrder { p, q, .. } = self.order;
        let with_constant = self.order.has_constant();
        let n_params = self.order.num_params();
        if p == 0 && q == 0 {
            // The standardised series is centred, so the constant is exactly 0
            return Ok(vec![0.0; n_params]);
        }

        let offset = usize::from(with_constant);
        let mut initial = vec![0.0; n_params];
        for i in 0..p {
            initial[offset + i] = 0.1 / (i + 1) as f64;
        }
        for j in 0..q {
            initial[offset + p + j] = 0.1 / (j + 1) as f64;
        }

        let mut bounds = Vec::with_capacity(n_params);
        if with_constant {
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(p + q));

        let objective = |params: &[f64]| css(z, self.order, params);

        let first = nelder_mead(objective, &initial, Some(&bounds), &self.config)?;
        // Restarting from the best vertex escapes a collapsed simplex
        let second = nelder_mead(objective, &first.optimal_point, Some(&bounds), &self.config)?;

        if !second.optimal_value.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "{} could not be estimated: the sum of squares is not finite",
                self.name
            )));
        }
        if !second.converged {
            log::warn!(
                "{} estimation did not converge after {} iterations",
                self.name,
                first.iterations + second.iterations
            );
        }

        Ok(second.optimal_point)
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(ArimaOrder::default())
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &[f64]) -> Result<TrainedArimaModel> {
        let ArimaOrder { p, d, q } = self.order;
        if series.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelError(
                "Series contains missing or non-finite values".to_string(),
            ));
        }

        let differenced = difference(series, d).map_err(|e| {
            ForecastError::ModelError(format!("{} cannot difference the series: {}", self.name, e))
        })?;

        let burn_in = p.max(q);
        if differenced.len() <= burn_in {
            return Err(ForecastError::ModelError(format!(
                "{} needs more than {} observations, got {}",
                self.name,
                burn_in + d,
                series.len()
            )));
        }

        // Estimate on a standardised copy so every parameter is of order one
        let center = if self.order.has_constant() {
            series_math::stats::mean(&differenced)
        } else {
            0.0
        };
        let spread = (differenced.iter().map(|w| (w - center).powi(2)).sum::<f64>()
            / differenced.len() as f64)
            .sqrt();
        let scale = if spread.is_finite() && spread > 1e-12 {
            spread
        } else {
            1.0
        };
        let z: Vec<f64> = differenced.iter().map(|w| (w - center) / scale).collect();

        log::debug!(
            "Estimating {} on {} differenced values",
            self.name,
            differenced.len()
        );
        let params_z = self.estimate(&z)?;
        let std_errors_z = standard_errors(&z, self.order, &params_z);

        let offset = usize::from(self.order.has_constant());
        let constant = if self.order.has_constant() {
            center + scale * params_z[0]
        } else {
            0.0
        };
        let ar_coefficients = params_z[offset..offset + p].to_vec();
        let ma_coefficients = params_z[offset + p..].to_vec();
        let std_errors: Vec<f64> = std_errors_z
            .iter()
            .enumerate()
            .map(|(i, se)| if i < offset { se * scale } else { *se })
            .collect();

        let all_residuals = one_step_errors(&differenced, self.order, constant, &ar_coefficients, &ma_coefficients);
        let effective = &all_residuals[burn_in..];
        let sigma2 = effective.iter().map(|e| e * e).sum::<f64>() / effective.len() as f64;
        if !sigma2.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "{} produced non-finite residuals",
                self.name
            )));
        }

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            constant,
            ar_coefficients,
            ma_coefficients,
            historical_data: series.to_vec(),
            differenced,
            all_residuals,
            burn_in,
            sigma2,
            std_errors,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    /// Get the model order
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Get the constant (mean of the differenced series), 0 when `d > 0`
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Get the AR coefficients
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    /// Get the MA coefficients
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Get the residual variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Gaussian log-likelihood of the conditional residuals
    pub fn log_likelihood(&self) -> f64 {
        let n = (self.all_residuals.len() - self.burn_in) as f64;
        -0.5 * n * ((2.0 * PI * self.sigma2).ln() + 1.0)
    }

    /// Akaike information criterion (sigma2 counted as a parameter)
    pub fn aic(&self) -> f64 {
        let k = (self.order.num_params() + 1) as f64;
        -2.0 * self.log_likelihood() + 2.0 * k
    }

    /// Bayesian information criterion
    pub fn bic(&self) -> f64 {
        let k = (self.order.num_params() + 1) as f64;
        let n = (self.all_residuals.len() - self.burn_in) as f64;
        -2.0 * self.log_likelihood() + k * n.ln()
    }

    fn parameters(&self) -> Vec<(String, f64)> {
        let mut params = Vec::with_capacity(self.order.num_params());
        if self.order.has_constant() {
            params.push(("const".to_string(), self.constant));
        }
        for (i, phi) in self.ar_coefficients.iter().enumerate() {
            params.push((format!("ar.L{}", i + 1), *phi));
        }
        for (j, theta) in self.ma_coefficients.iter().enumerate() {
            params.push((format!("ma.L{}", j + 1), *theta));
        }
        params
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Ok(Vec::new());
        }
        if self.historical_data.is_empty() {
            return Err(ForecastError::ModelError(
                "Model has not been fitted to data".to_string(),
            ));
        }

        let d = self.order.d;
        let mut extended = self.differenced.clone();
        let mut shocks = self.all_residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut pred = self.constant;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                pred += phi * (extended[t - 1 - i] - self.constant);
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                pred += theta * shocks[t - 1 - j];
            }
            extended.push(pred);
            shocks.push(0.0);
        }

        let on_diff_scale = &extended[self.differenced.len()..];
        Ok(integrate(on_diff_scale, &self.historical_data, d)?)
    }

    fn residuals(&self) -> &[f64] {
        &self.all_residuals[self.burn_in..]
    }

    fn summary(&self) -> ModelSummary {
        let normal = Normal::new(0.0, 1.0).ok();
        let z_crit = normal.as_ref().map_or(1.96, |n| n.inverse_cdf(0.975));
        let coefficients = self
            .parameters()
            .into_iter()
            .zip(self.std_errors.iter())
            .map(|((name, value), &std_error)| {
                let z = value / std_error;
                let p_value = match &normal {
                    Some(n) if z.is_finite() => 2.0 * (1.0 - n.cdf(z.abs())),
                    _ => f64::NAN,
                };
                CoefficientEstimate {
                    name,
                    value,
                    std_error,
                    z,
                    p_value,
                    lower: value - z_crit * std_error,
                    upper: value + z_crit * std_error,
                }
            })
            .collect();

        ModelSummary {
            model: self.name.clone(),
            method: "CSS".to_string(),
            n_obs: self.historical_data.len(),
            n_effective: self.all_residuals.len() - self.burn_in,
            log_likelihood: self.log_likelihood(),
            aic: self.aic(),
            bic: self.bic(),
            sigma2: self.sigma2,
            coefficients,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Split a flat parameter vector into constant, AR and MA parts
fn unpack(order: ArimaOrder, params: &[f64]) -> (f64, &[f64], &[f64]) {
    let offset = usize::from(order.has_constant());
    let constant = if order.has_constant() { params[0] } else { 0.0 };
    (
        constant,
        &params[offset..offset + order.p],
        &params[offset + order.p..offset + order.p + order.q],
    )
}

/// One-step prediction errors; the first `max(p, q)` entries are zero
fn one_step_errors(series: &[f64], order: ArimaOrder, constant: f64, ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let n = series.len();
    let start = order.p.max(order.q);
    let mut errors = vec![0.0; n];

    for t in start..n {
        let mut pred = constant;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (series[t - 1 - i] - constant);
        }
        for (j, theta) in ma.iter().enumerate() {
            pred += theta * errors[t - 1 - j];
        }
        errors[t] = series[t] - pred;
    }

    errors
}

/// Conditional sum of squares for a flat parameter vector
fn css(series: &[f64], order: ArimaOrder, params: &[f64]) -> f64 {
    let (constant, ar, ma) = unpack(order, params);
    let start = order.p.max(order.q);
    one_step_errors(series, order, constant, ar, ma)[start..]
        .iter()
        .map(|e| e * e)
        .sum()
}

/// Standard errors from the numerical Hessian of the concentrated negative log-likelihood
fn standard_errors(series: &[f64], order: ArimaOrder, params: &[f64]) -> Vec<f64> {
    let k = params.len();
    if k == 0 {
        return Vec::new();
    }

    let n_eff = (series.len() - order.p.max(order.q)) as f64;
    let neg_ll = |x: &[f64]| 0.5 * n_eff * (css(series, order, x) / n_eff).ln();

    let steps: Vec<f64> = params.iter().map(|v| 1e-4 * v.abs().max(1.0)).collect();
    let mut hessian = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in i..k {
            let value = {
                let eval = |di: f64, dj: f64| {
                    let mut x = params.to_vec();
                    x[i] += di;
                    x[j] += dj;
                    neg_ll(&x)
                };
                let (hi, hj) = (steps[i], steps[j]);
                (eval(hi, hj) - eval(hi, -hj) - eval(-hi, hj) + eval(-hi, -hj)) / (4.0 * hi * hj)
            };
            hessian[i][j] = value;
            hessian[j][i] = value;
        }
    }

    match invert(hessian) {
        Some(covariance) => (0..k)
            .map(|i| {
                let var = covariance[i][i];
                if var.is_finite() && var > 0.0 {
                    var.sqrt()
                } else {
                    f64::NAN
                }
            })
            .collect(),
        None => vec![f64::NAN; k],
    }
}

/// Gauss-Jordan inversion with partial pivoting; `None` when singular
fn invert(mut matrix: Vec<Vec<f64>>) -> Option<Vec<Vec<f64>>> {
    let n = matrix.len();
    let mut inverse: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&a, &b| {
            matrix[a][col]
                .abs()
                .partial_cmp(&matrix[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if !matrix[pivot][col].is_finite() || matrix[pivot][col].abs() < 1e-12 {
            return None;
        }
        matrix.swap(col, pivot);
        inverse.swap(col, pivot);

        let diag = matrix[col][col];
        for j in 0..n {
            matrix[col][j] /= diag;
            inverse[col][j] /= diag;
        }

        for row in 0..n {
            if row == col {
                continue;
            }
            let factor = matrix[row][col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                matrix[row][j] -= factor * matrix[col][j];
                inverse[row][j] -= factor * inverse[col][j];
            }
        }
    }

    Some(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_order_bounds() {
        assert!(ArimaOrder::new(6, 5, 10).is_ok());
        assert!(matches!(
            ArimaOrder::new(7, 0, 0),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(ArimaOrder::new(0, 6, 0).is_err());
        assert!(ArimaOrder::new(0, 0, 11).is_err());
    }

    #[test]
    fn test_constant_only_when_undifferenced() {
        assert!(ArimaOrder::new(1, 0, 1).unwrap().has_constant());
        assert!(!ArimaOrder::new(1, 1, 1).unwrap().has_constant());
        assert_eq!(ArimaOrder::new(2, 0, 1).unwrap().num_params(), 4);
        assert_eq!(ArimaOrder::new(2, 1, 1).unwrap().num_params(), 3);
    }

    #[test]
    fn test_white_noise_model_is_the_mean() {
        let series = [10.0, 12.0, 9.0, 11.0, 13.0, 8.0];
        let model = ArimaModel::new(ArimaOrder::new(0, 0, 0).unwrap());
        let trained = model.train(&series).unwrap();

        assert_relative_eq!(trained.constant(), 10.5, epsilon = 1e-6);
        let forecast = trained.forecast(3).unwrap();
        for value in forecast {
            assert_relative_eq!(value, 10.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_random_walk_forecast_is_flat() {
        let series = [5.0, 7.0, 6.0, 9.0, 8.0];
        let model = ArimaModel::new(ArimaOrder::new(0, 1, 0).unwrap());
        let trained = model.train(&series).unwrap();

        assert_eq!(trained.forecast(4).unwrap(), vec![8.0; 4]);
        assert_eq!(trained.residuals(), &[2.0, -1.0, 3.0, -1.0]);
    }

    #[test]
    fn test_css_matches_manual_ar1() {
        let series = [1.0, 2.0, 3.0];
        let order = ArimaOrder::new(1, 0, 0).unwrap();
        // pred_1 = 0 + 0.5*1, pred_2 = 0 + 0.5*2
        let value = css(&series, order, &[0.0, 0.5]);
        assert_relative_eq!(value, 1.5f64.powi(2) + 2.0f64.powi(2));
    }

    #[test]
    fn test_invert_identity_scaled() {
        let inv = invert(vec![vec![2.0, 0.0], vec![0.0, 4.0]]).unwrap();
        assert_relative_eq!(inv[0][0], 0.5);
        assert_relative_eq!(inv[1][1], 0.25);
        assert!(invert(vec![vec![1.0, 2.0], vec![2.0, 4.0]]).is_none());
    }
}
