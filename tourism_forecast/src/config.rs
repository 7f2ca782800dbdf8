//! Application configuration
//!
//! All fields are optional in the JSON file; anything left out takes the
//! default. Command-line flags override the loaded values.
//!
//! ```json
//! {
//!   "data_path": "data/Data_Wisata.csv",
//!   "value_column": "Jumlah Wisatawan",
//!   "order": { "p": 2, "d": 1, "q": 1 },
//!   "steps": 12
//! }
//! ```

use crate::data::{DEFAULT_TIME_COLUMN, DEFAULT_VALUE_COLUMN};
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use crate::runner::MAX_STEPS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings shared by all views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// CSV file holding the dataset
    pub data_path: PathBuf,
    /// Name of the month column
    pub time_column: String,
    /// Column forecast when none is given
    pub value_column: String,
    /// Directory the plots are written to
    pub plot_dir: PathBuf,
    /// Model order used when none is given
    pub order: ArimaOrder,
    /// Forecast horizon used when none is given
    pub steps: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/Data_Wisata.csv"),
            time_column: DEFAULT_TIME_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            plot_dir: PathBuf::from("plots"),
            order: ArimaOrder::default(),
            steps: 0,
        }
    }
}

impl AppConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                ForecastError::ConfigError(format!("{} does not exist", path.display()))
            }
            _ => ForecastError::IoError(e),
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the defaults fall inside the accepted request ranges
    pub fn validate(&self) -> Result<()> {
        let ArimaOrder { p, d, q } = self.order;
        ArimaOrder::new(p, d, q).map_err(|e| ForecastError::ConfigError(e.to_string()))?;
        if self.steps > MAX_STEPS {
            return Err(ForecastError::ConfigError(format!(
                "steps must be at most {}, got {}",
                MAX_STEPS, self.steps
            )));
        }
        if self.time_column.trim().is_empty() || self.value_column.trim().is_empty() {
            return Err(ForecastError::ConfigError(
                "column names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
