//! Forecast pipeline: load, prepare, fit, forecast, evaluate, diagnose
//!
//! Every run starts from the file on disk and either produces a complete
//! report or stops at the first failure.

use crate::data::Dataset;
use crate::diagnostics::{residual_acf, residual_pacf, Correlogram};
use crate::error::{ForecastError, Result};
use crate::metrics::{tail_overlap_metrics, ErrorMetrics};
use crate::models::arima::{ArimaModel, ArimaOrder};
use crate::models::{ForecastModel, ModelSummary, TrainedForecastModel};
use crate::period::Month;
use crate::store::DatasetStore;
use crate::utils::future_months;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Largest accepted forecast horizon
pub const MAX_STEPS: usize = 100;

/// Minimum number of usable rows for a forecast
pub const MIN_OBSERVATIONS: usize = 2;

/// What to forecast and how
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    /// Value column to forecast
    pub column: String,
    /// ARIMA order
    pub order: ArimaOrder,
    /// Number of months to forecast
    pub steps: usize,
}

impl ForecastRequest {
    /// Build a request, checking the order and horizon ranges
    pub fn new(column: impl Into<String>, p: usize, d: usize, q: usize, steps: usize) -> Result<Self> {
        let order = ArimaOrder::new(p, d, q)?;
        if steps > MAX_STEPS {
            return Err(ForecastError::InvalidParameter(format!(
                "steps must be between 0 and {}, got {}",
                MAX_STEPS, steps
            )));
        }
        Ok(Self {
            column: column.into(),
            order,
            steps,
        })
    }
}

/// A value attached to a calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: Month,
    pub value: f64,
}

/// Everything produced by one forecast run
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    /// Forecast column
    pub column: String,
    /// Model order
    pub order: ArimaOrder,
    /// Observations used for fitting, in chronological order
    pub observed: Vec<MonthlyPoint>,
    /// Rows dropped for an unparseable month, a duplicate month or a missing value
    pub dropped_rows: usize,
    /// Fitted model summary
    pub summary: ModelSummary,
    /// Forecast values for the months after the last observation
    pub forecast: Vec<MonthlyPoint>,
    /// Error metrics on the overlapping tail; `None` means insufficient data
    pub metrics: Option<ErrorMetrics>,
    /// In-sample residuals of the fitted model
    pub residuals: Vec<f64>,
    /// Residual autocorrelation
    pub acf: Correlogram,
    /// Residual partial autocorrelation
    pub pacf: Correlogram,
}

impl ForecastReport {
    /// Forecast values without their months
    pub fn forecast_values(&self) -> Vec<f64> {
        self.forecast.iter().map(|p| p.value).collect()
    }

    /// Printable forecast table
    pub fn forecast_table(&self) -> ForecastTable<'_> {
        ForecastTable(self)
    }
}

/// Display adapter listing the forecast month by month
pub struct ForecastTable<'a>(&'a ForecastReport);

impl fmt::Display for ForecastTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8}  {}", "", self.0.column)?;
        for point in &self.0.forecast {
            writeln!(f, "{:<8}  {:.2}", point.month, point.value)?;
        }
        Ok(())
    }
}

/// Forecast runner over an injected store
#[derive(Debug)]
pub struct ForecastRunner<S: DatasetStore> {
    store: S,
    time_column: String,
}

impl<S: DatasetStore> ForecastRunner<S> {
    /// Create a runner expecting `time_column` as the dataset's month column
    pub fn new(store: S, time_column: impl Into<String>) -> Self {
        Self {
            store,
            time_column: time_column.into(),
        }
    }

    /// Load the dataset this runner forecasts from
    pub fn load(&self) -> Result<Dataset> {
        self.store.load()
    }

    /// Run the whole pipeline for one request
    pub fn run(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        let dataset = self.store.load()?;
        let (observed, dropped_rows) = prepare_series(&dataset, &self.time_column, &request.column)?;
        let values: Vec<f64> = observed.iter().map(|p| p.value).collect();

        let model = ArimaModel::new(request.order);
        log::debug!("Fitting {} on {} observations", model.name(), values.len());
        let trained = model.train(&values)?;

        let forecast_values = trained.forecast(request.steps)?;
        let last_month = observed
            .last()
            .map(|p| p.month)
            .ok_or(ForecastError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: 0,
            })?;
        let forecast: Vec<MonthlyPoint> = future_months(last_month, forecast_values.len())?
            .into_iter()
            .zip(forecast_values.iter())
            .map(|(month, &value)| MonthlyPoint { month, value })
            .collect();

        let metrics = tail_overlap_metrics(&values, &forecast_values);
        let residuals = trained.residuals().to_vec();
        let acf = residual_acf(&residuals)?;
        let pacf = residual_pacf(&residuals)?;

        log::info!(
            "{} forecast {} steps for '{}'",
            trained.name(),
            forecast.len(),
            request.column
        );

        Ok(ForecastReport {
            column: request.column.clone(),
            order: request.order,
            observed,
            dropped_rows,
            summary: trained.summary(),
            forecast,
            metrics,
            residuals,
            acf,
            pacf,
        })
    }
}

/// Turn the stored rows into a chronological monthly series for `column`
///
/// Returns the series and the number of rows that were dropped.
pub fn prepare_series(
    dataset: &Dataset,
    time_column: &str,
    column: &str,
) -> Result<(Vec<MonthlyPoint>, usize)> {
    if dataset.time_column() != time_column {
        return Err(ForecastError::MissingColumn(time_column.to_string()));
    }
    if !dataset.value_columns().contains(&column) {
        return Err(ForecastError::UnknownColumn(column.to_string()));
    }

    let mut dated: Vec<(Month, Option<f64>)> = dataset
        .observations()
        .iter()
        .filter_map(|obs| match Month::parse_lenient(&obs.period) {
            Some(month) => Some((month, obs.value)),
            None => {
                log::debug!("Dropping row with unparseable month '{}'", obs.period);
                None
            }
        })
        .collect();
    dated.sort_by_key(|(month, _)| *month);

    // Drop missing values before de-duplicating months
    let mut seen = HashSet::new();
    let points: Vec<MonthlyPoint> = dated
        .into_iter()
        .filter_map(|(month, value)| value.map(|value| MonthlyPoint { month, value }))
        .filter(|point| seen.insert(point.month))
        .collect();

    if points.len() < MIN_OBSERVATIONS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_OBSERVATIONS,
            got: points.len(),
        });
    }

    let dropped = dataset.len() - points.len();
    Ok((points, dropped))
}
