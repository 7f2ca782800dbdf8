//! Forecasting models for monthly series

use crate::error::Result;
use serde::Serialize;
use std::fmt::{self, Debug};

/// One estimated parameter with its inference statistics
#[derive(Debug, Clone, Serialize)]
pub struct CoefficientEstimate {
    /// Parameter name, e.g. `ar.L1`
    pub name: String,
    /// Point estimate
    pub value: f64,
    /// Standard error (`NaN` when the information matrix is singular)
    pub std_error: f64,
    /// z statistic
    pub z: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Lower 95% bound
    pub lower: f64,
    /// Upper 95% bound
    pub upper: f64,
}

/// Printable description of a fitted model
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    /// Model name, e.g. `ARIMA(1, 1, 1)`
    pub model: String,
    /// Estimation method
    pub method: String,
    /// Number of observations in the training series
    pub n_obs: usize,
    /// Number of residuals entering the likelihood
    pub n_effective: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Residual variance
    pub sigma2: f64,
    pub coefficients: Vec<CoefficientEstimate>,
}

const RULE_WIDTH: usize = 78;

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);

        writeln!(f, "{:^width$}", "Model Results", width = RULE_WIDTH)?;
        writeln!(f, "{}", heavy)?;
        writeln!(
            f,
            "{:<16}{:>22}   {:<20}{:>17}",
            "Model:", self.model, "No. Observations:", self.n_obs
        )?;
        writeln!(
            f,
            "{:<16}{:>22}   {:<20}{:>17.3}",
            "Method:", self.method, "Log Likelihood", self.log_likelihood
        )?;
        writeln!(
            f,
            "{:<16}{:>22}   {:<20}{:>17.3}",
            "Sample:",
            format!("0 - {}", self.n_obs),
            "AIC",
            self.aic
        )?;
        writeln!(f, "{:<41}{:<20}{:>17.3}", "", "BIC", self.bic)?;
        writeln!(f, "{:<41}{:<20}{:>17.4e}", "", "sigma2", self.sigma2)?;
        writeln!(f, "{}", heavy)?;
        writeln!(
            f,
            "{:<12}{:>11}{:>11}{:>11}{:>11}{:>11}{:>11}",
            "", "coef", "std err", "z", "P>|z|", "[0.025", "0.975]"
        )?;
        writeln!(f, "{}", light)?;
        for c in &self.coefficients {
            writeln!(
                f,
                "{:<12}{:>11.4}{:>11.4}{:>11.3}{:>11.3}{:>11.3}{:>11.3}",
                c.name, c.value, c.std_error, c.z, c.p_value, c.lower, c.upper
            )?;
        }
        write!(f, "{}", heavy)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast the next `horizon` values after the training series
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// In-sample one-step residuals
    fn residuals(&self) -> &[f64];

    /// Summary of the fitted parameters
    fn summary(&self) -> ModelSummary;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a plain series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the values in row order
    fn train(&self, series: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
