//! # Tourism Forecast
//!
//! A Rust library for keeping a monthly tourist-count dataset and forecasting it
//! with ARIMA models.
//!
//! ## Features
//!
//! - CSV-backed dataset store with add and delete, guarded by a version stamp
//! - Data editor that turns every failure into a one-line message
//! - ARIMA(p, d, q) estimation by conditional sum of squares
//! - Error metrics (MAPE, MAE, MSE, RMSE) and residual ACF/PACF diagnostics
//! - SVG plots of the forecast and the residual correlograms
//!
//! ## Quick Start
//!
//! ```no_run
//! use tourism_forecast::runner::{ForecastRequest, ForecastRunner};
//! use tourism_forecast::store::CsvDatasetStore;
//!
//! let store = CsvDatasetStore::new("data/Data_Wisata.csv");
//! let runner = ForecastRunner::new(store, "Bulan");
//!
//! // ARIMA(1, 1, 1), twelve months ahead
//! let request = ForecastRequest::new("Jumlah Wisatawan", 1, 1, 1, 12)?;
//! let report = runner.run(&request)?;
//!
//! println!("{}", report.summary);
//! println!("{}", report.forecast_table());
//! if let Some(metrics) = &report.metrics {
//!     println!("{}", metrics);
//! }
//! # Ok::<(), tourism_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod metrics;
pub mod models;
pub mod period;
pub mod plots;
pub mod runner;
pub mod store;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::data::{Dataset, Observation};
pub use crate::editor::{DataEditor, EditOutcome, EditStatus};
pub use crate::error::{ForecastError, Result};
pub use crate::metrics::ErrorMetrics;
pub use crate::models::arima::{ArimaModel, ArimaOrder, TrainedArimaModel};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::period::Month;
pub use crate::runner::{ForecastReport, ForecastRequest, ForecastRunner};
pub use crate::store::{CsvDatasetStore, DatasetStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
