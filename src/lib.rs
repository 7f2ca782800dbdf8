//! # Tourism ARIMA Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`series_math`]: differencing, autocorrelation and the Nelder-Mead minimiser
//! - [`tourism_forecast`]: dataset store, data editor, ARIMA forecast runner and views
//!
//! ## Example
//!
//! ```
//! use tourism_arima_workspace::series_math::difference;
//!
//! let diffed = difference(&[100.0, 120.0, 150.0], 1).unwrap();
//! assert_eq!(diffed, vec![20.0, 30.0]);
//! ```

pub use series_math;
pub use tourism_forecast;

pub use tourism_forecast::{
    ArimaOrder, CsvDatasetStore, DataEditor, ForecastError, ForecastRequest, ForecastRunner,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_resolve() {
        let order = ArimaOrder::default();
        assert_eq!(order.to_string(), "(1, 1, 1)");
        assert!(series_math::default_acf_lags(100) > 0);
    }
}
