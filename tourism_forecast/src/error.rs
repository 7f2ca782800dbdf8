//! Error types for the tourism_forecast crate

use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for the tourism_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The dataset file does not exist
    #[error("Dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed user input or file contents
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Row index outside the dataset
    #[error("Index {index} is out of range for a dataset of {len} rows")]
    RangeError { index: i64, len: usize },

    /// The configured time column is not in the dataset
    #[error("Time column '{0}' not found in data")]
    MissingColumn(String),

    /// The requested value column is not in the dataset
    #[error("Column '{0}' is not a value column of the dataset")]
    UnknownColumn(String),

    /// Too few usable rows to fit a model
    #[error("Insufficient data: need at least {needed} data points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Model fitting or forecasting failed
    #[error("Model error: {0}")]
    ModelError(String),

    /// A request parameter is out of its allowed range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The file changed on disk after the dataset was loaded
    #[error("Dataset was modified on disk after it was loaded; reload and try again")]
    ConcurrentModification,

    /// Configuration could not be read
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Rendering a plot failed
    #[error("Plot error: {0}")]
    PlotError(String),

    /// Error from the CSV reader or writer
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the numeric routines
    #[error("Math error: {0}")]
    MathError(#[from] series_math::MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl ForecastError {
    /// One-line message suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::NotFound(_) => {
                "File not found. Make sure the CSV file is in the correct location.".to_string()
            }
            ForecastError::ValidationError(msg) => msg.clone(),
            ForecastError::RangeError { .. } => format!("Invalid index. {}", self),
            ForecastError::InsufficientData { .. } => {
                "The selected column must have more than one data point to forecast.".to_string()
            }
            other => format!("An error occurred: {}", other),
        }
        .replace('\n', " ")
    }
}
