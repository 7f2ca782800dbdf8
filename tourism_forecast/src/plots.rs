//! SVG rendering of the forecast and residual correlograms

use crate::diagnostics::Correlogram;
use crate::error::{ForecastError, Result};
use crate::runner::{ForecastReport, MonthlyPoint};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const PLOT_SIZE: (u32, u32) = (1000, 600);

/// Files written for one report
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PlotFiles {
    pub forecast: PathBuf,
    pub acf: PathBuf,
    pub pacf: PathBuf,
}

fn plot_err<E: std::fmt::Display>(err: E) -> ForecastError {
    ForecastError::PlotError(err.to_string())
}

/// Render all three plots of `report` into `dir`, creating it if needed
pub fn render_report(report: &ForecastReport, dir: &Path) -> Result<PlotFiles> {
    fs::create_dir_all(dir)?;
    let files = PlotFiles {
        forecast: dir.join("forecast.svg"),
        acf: dir.join("residual_acf.svg"),
        pacf: dir.join("residual_pacf.svg"),
    };

    render_forecast(&report.observed, &report.forecast, &report.column, &files.forecast)?;
    render_correlogram(&report.acf, "ACF (Residual)", &files.acf)?;
    render_correlogram(&report.pacf, "PACF (Residual)", &files.pacf)?;

    log::debug!("Plots written to {}", dir.display());
    Ok(files)
}

/// Original series and forecast on a shared month axis
pub fn render_forecast(
    observed: &[MonthlyPoint],
    forecast: &[MonthlyPoint],
    column: &str,
    path: &Path,
) -> Result<()> {
    let labels: Vec<String> = observed
        .iter()
        .chain(forecast.iter())
        .map(|p| p.month.to_string())
        .collect();
    let total = labels.len().max(2);

    let (lo, hi) = observed
        .iter()
        .chain(forecast.iter())
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let (lo, hi) = padded_range(lo, hi);

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("ARIMA Forecast", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..(total - 1) as f64, lo..hi)
        .map_err(plot_err)?;

    let label_at = |x: &f64| {
        let index = x.round();
        if index < 0.0 || (index - x).abs() > 1e-6 {
            return String::new();
        }
        labels.get(index as usize).cloned().unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&label_at)
        .y_desc(column)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            observed.iter().enumerate().map(|(i, p)| (i as f64, p.value)),
            &BLUE,
        ))
        .map_err(plot_err)?
        .label("Original")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    if !forecast.is_empty() {
        let offset = observed.len();
        chart
            .draw_series(LineSeries::new(
                forecast
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ((offset + i) as f64, p.value)),
                &RED,
            ))
            .map_err(plot_err)?
            .label("Forecast")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Stem plot of a correlogram with its confidence band
pub fn render_correlogram(correlogram: &Correlogram, title: &str, path: &Path) -> Result<()> {
    let max_lag = correlogram.max_lag().max(1) as f64;

    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..max_lag + 0.5, -1.1f64..1.1f64)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Lag")
        .y_desc(correlogram.kind.to_string())
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(-0.5, 0.0), (max_lag + 0.5, 0.0)],
            BLACK,
        )))
        .map_err(plot_err)?;

    let band: Vec<(f64, f64)> = correlogram
        .band
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, b)| b.is_finite())
        .map(|(lag, b)| (lag as f64, *b))
        .collect();
    if !band.is_empty() {
        let shade = BLUE.mix(0.4);
        chart
            .draw_series(LineSeries::new(band.iter().copied(), shade))
            .map_err(plot_err)?;
        chart
            .draw_series(LineSeries::new(band.iter().map(|(x, b)| (*x, -b)), shade))
            .map_err(plot_err)?;
    }

    let stems = correlogram
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(lag, v)| (lag as f64, v.clamp(-1.0, 1.0)));
    for (lag, value) in stems {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(lag, 0.0), (lag, value)],
                BLUE.stroke_width(2),
            )))
            .map_err(plot_err)?;
        chart
            .draw_series(std::iter::once(Circle::new((lag, value), 4, BLUE.filled())))
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Axis range with 5% padding; degenerate ranges are widened around the value
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        let pad = lo.abs().max(1.0) * 0.1;
        return (lo - pad, hi + pad);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range(0.0, 100.0), (-5.0, 105.0));
        assert_eq!(padded_range(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = padded_range(50.0, 50.0);
        assert!(lo < 50.0 && hi > 50.0);
    }
}
