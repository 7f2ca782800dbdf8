//! The three pages of the tool and their dispatch
//!
//! Each page writes plain text to the given sink. Failures from the editor,
//! runner or plot renderer never escape a page: they are printed as a single
//! `Error: ...` line. Only a failing sink is reported to the caller.

use crate::config::AppConfig;
use crate::editor::{DataEditor, EditStatus};
use crate::error::ForecastError;
use crate::models::arima::ArimaOrder;
use crate::plots::{render_report, PlotFiles};
use crate::runner::{ForecastReport, ForecastRequest, ForecastRunner};
use crate::store::CsvDatasetStore;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

const HOME_TITLE: &str =
    "Forecasting Domestic Tourist Trips to Surabaya with ARIMA";

const HOME_DESCRIPTION: &str = "Forecasting the number of domestic tourist trips to \
Surabaya with ARIMA (AutoRegressive Integrated Moving Average) is a statistical \
technique that predicts future values of a variable from the historical data \
available. Here the predicted variable is the number of domestic tourist trips \
to Surabaya, and the history is the recorded number of trips per month.";

/// A page that can be rendered against the application configuration
pub trait Page {
    fn render(&self, config: &AppConfig, out: &mut dyn Write) -> io::Result<()>;
}

/// Editing action requested on the data page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataAction {
    /// Only show the table
    Show,
    /// Append a row from the raw month label and count
    Add { period: String, value: String },
    /// Delete the row at the raw index
    Delete { index: String },
}

/// Options of the forecast page; `None` falls back to the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForecastArgs {
    pub column: Option<String>,
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
    pub steps: Option<usize>,
    pub plot_dir: Option<PathBuf>,
    /// Emit the report as JSON instead of text
    pub json: bool,
}

impl ForecastArgs {
    /// Resolve the request against the configured defaults
    pub fn request(&self, config: &AppConfig) -> crate::Result<ForecastRequest> {
        let ArimaOrder { p, d, q } = config.order;
        ForecastRequest::new(
            self.column.clone().unwrap_or_else(|| config.value_column.clone()),
            self.p.unwrap_or(p),
            self.d.unwrap_or(d),
            self.q.unwrap_or(q),
            self.steps.unwrap_or(config.steps),
        )
    }

    fn plot_dir(&self, config: &AppConfig) -> PathBuf {
        self.plot_dir.clone().unwrap_or_else(|| config.plot_dir.clone())
    }
}

/// The selected page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Data(DataAction),
    Forecast(ForecastArgs),
}

impl Page for View {
    fn render(&self, config: &AppConfig, out: &mut dyn Write) -> io::Result<()> {
        match self {
            View::Home => HomePage.render(config, out),
            View::Data(action) => DataPage { action }.render(config, out),
            View::Forecast(args) => ForecastPage { args }.render(config, out),
        }
    }
}

fn store(config: &AppConfig) -> CsvDatasetStore {
    CsvDatasetStore::new(&config.data_path).with_time_column(&config.time_column)
}

fn write_error(out: &mut dyn Write, err: &ForecastError) -> io::Result<()> {
    writeln!(out, "Error: {}", err.user_message())
}

/// Title and description of the tool
pub struct HomePage;

impl Page for HomePage {
    fn render(&self, _config: &AppConfig, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", HOME_TITLE)?;
        writeln!(out, "{}", "=".repeat(HOME_TITLE.len()))?;
        writeln!(out)?;
        writeln!(out, "{}", HOME_DESCRIPTION)
    }
}

/// Dataset table with an optional add or delete
pub struct DataPage<'a> {
    pub action: &'a DataAction,
}

impl Page for DataPage<'_> {
    fn render(&self, config: &AppConfig, out: &mut dyn Write) -> io::Result<()> {
        let editor = DataEditor::new(store(config));
        let outcome = match self.action {
            DataAction::Show => editor.current(),
            DataAction::Add { period, value } => editor.add(period, value),
            DataAction::Delete { index } => editor.delete(index),
        };

        writeln!(out, "Domestic Tourist Trips to Surabaya")?;
        writeln!(out)?;
        match &outcome.status {
            EditStatus::Idle => {}
            EditStatus::Success(msg) => writeln!(out, "{}", msg)?,
            EditStatus::Failure(msg) => writeln!(out, "Error: {}", msg)?,
        }
        if let Some(dataset) = &outcome.dataset {
            writeln!(out, "Latest data:")?;
            write!(out, "{}", dataset)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct ForecastOutput<'a> {
    report: &'a ForecastReport,
    plots: Option<PlotFiles>,
}

/// Model fit, forecast, error metrics and plots for one column
pub struct ForecastPage<'a> {
    pub args: &'a ForecastArgs,
}

impl ForecastPage<'_> {
    fn render_json(&self, config: &AppConfig, out: &mut dyn Write) -> io::Result<()> {
        let runner = ForecastRunner::new(store(config), &config.time_column);
        let result = self
            .args
            .request(config)
            .and_then(|request| runner.run(&request));

        let json = match result {
            Ok(report) => {
                let plots = render_report(&report, &self.args.plot_dir(config))
                    .map_err(|e| log::warn!("{}", e))
                    .ok();
                serde_json::to_string_pretty(&ForecastOutput {
                    report: &report,
                    plots,
                })
            }
            Err(err) => serde_json::to_string(&serde_json::json!({ "error": err.user_message() })),
        }
        .map_err(io::Error::other)?;
        writeln!(out, "{}", json)
    }
}

impl Page for ForecastPage<'_> {
    fn render(&self, config: &AppConfig, out: &mut dyn Write) -> io::Result<()> {
        if self.args.json {
            return self.render_json(config, out);
        }

        writeln!(out, "ARIMA Forecast for East Java")?;
        writeln!(out)?;

        let request = match self.args.request(config) {
            Ok(request) => request,
            Err(err) => return write_error(out, &err),
        };
        let runner = ForecastRunner::new(store(config), &config.time_column);

        match runner.load() {
            Ok(dataset) => {
                writeln!(out, "Tourist Counts for Surabaya")?;
                write!(out, "{}", dataset)?;
                writeln!(out)?;
            }
            Err(err) => return write_error(out, &err),
        }

        let report = match runner.run(&request) {
            Ok(report) => report,
            Err(err) => return write_error(out, &err),
        };

        writeln!(out, "ARIMA Model Summary")?;
        write!(out, "{}", report.summary)?;
        writeln!(out)?;

        writeln!(out, "Forecast")?;
        write!(out, "{}", report.forecast_table())?;
        writeln!(out)?;

        writeln!(out, "Model Evaluation: Error Metrics")?;
        match &report.metrics {
            Some(metrics) => writeln!(out, "{}", metrics)?,
            None => writeln!(out, "Not enough data to compute error metrics.")?,
        }
        writeln!(out)?;

        let significant = report.acf.significant_lags();
        if !significant.is_empty() {
            writeln!(out, "Residual autocorrelation outside the 95% band at lags {:?}", significant)?;
        }

        match render_report(&report, &self.args.plot_dir(config)) {
            Ok(files) => {
                writeln!(out, "Forecast plot: {}", files.forecast.display())?;
                writeln!(out, "Residual ACF plot: {}", files.acf.display())?;
                writeln!(out, "Residual PACF plot: {}", files.pacf.display())?;
            }
            Err(err) => write_error(out, &err)?,
        }
        Ok(())
    }
}
