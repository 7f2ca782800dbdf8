//! # Series Math
//!
//! Numeric building blocks for univariate time series models.
//! This crate provides differencing, sample autocorrelation and partial
//! autocorrelation, and a bounded Nelder-Mead minimiser used to estimate
//! ARIMA coefficients.

use thiserror::Error;

pub mod correlation;
pub mod differencing;
pub mod optimization;
pub mod stats;

pub use correlation::{acf, bartlett_standard_errors, default_acf_lags, default_pacf_lags, pacf_ywm};
pub use differencing::{difference, integrate};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
