use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;
use tourism_forecast::data::{Dataset, Observation};
use tourism_forecast::error::{ForecastError, Result};
use tourism_forecast::period::Month;
use tourism_forecast::runner::{prepare_series, ForecastRequest, ForecastRunner};
use tourism_forecast::store::{CsvDatasetStore, DatasetStore};

/// Read-only store serving a fixed dataset
struct FixedStore(Dataset);

impl DatasetStore for FixedStore {
    fn load(&self) -> Result<Dataset> {
        Ok(self.0.clone())
    }

    fn append(&self, _dataset: &Dataset, _period: &str, _value: &str) -> Result<Dataset> {
        Err(ForecastError::ValidationError("read-only".to_string()))
    }

    fn delete_at(&self, _dataset: &Dataset, _index: i64) -> Result<Dataset> {
        Err(ForecastError::ValidationError("read-only".to_string()))
    }
}

fn monthly_rows(count: usize) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let year = 2021 + i / 12;
            let month = i % 12 + 1;
            let value = 2000.0 + 15.0 * i as f64 + 120.0 * ((i as f64) * 0.9).sin();
            Observation::new(format!("{:04}-{:02}", year, month), value.round())
        })
        .collect()
}

fn fixed_runner(rows: Vec<Observation>) -> ForecastRunner<FixedStore> {
    let dataset = Dataset::with_observations("Bulan", "Jumlah Wisatawan", rows);
    ForecastRunner::new(FixedStore(dataset), "Bulan")
}

fn request(steps: usize) -> ForecastRequest {
    ForecastRequest::new("Jumlah Wisatawan", 1, 1, 1, steps).unwrap()
}

#[test]
fn test_zero_steps_gives_empty_forecast() {
    let runner = fixed_runner(monthly_rows(24));
    let report = runner.run(&request(0)).unwrap();

    assert!(report.forecast.is_empty());
    assert!(report.metrics.is_none());
    assert_eq!(report.observed.len(), 24);
    assert_eq!(report.summary.model, "ARIMA(1, 1, 1)");
}

#[test]
fn test_forecast_months_follow_last_observation() {
    let runner = fixed_runner(monthly_rows(24));
    let report = runner.run(&request(3)).unwrap();

    let months: Vec<String> = report.forecast.iter().map(|p| p.month.to_string()).collect();
    assert_eq!(months, vec!["2023-01", "2023-02", "2023-03"]);
    assert!(report.forecast_values().iter().all(|v| v.is_finite()));

    let metrics = report.metrics.unwrap();
    assert_eq!(metrics.compared, 3);
    assert!(metrics.rmse >= metrics.mae);
}

#[test]
fn test_residual_diagnostics_are_attached() {
    let runner = fixed_runner(monthly_rows(36));
    let report = runner.run(&request(12)).unwrap();

    // 36 observations, one difference, one burn-in value
    assert_eq!(report.residuals.len(), 34);
    assert_eq!(report.acf.n, 34);
    assert_eq!(report.acf.max_lag(), 15);
    assert_eq!(report.pacf.max_lag(), 15);
}

#[test]
fn test_single_row_is_insufficient() {
    let runner = fixed_runner(monthly_rows(1));

    match runner.run(&request(3)) {
        Err(ForecastError::InsufficientData { needed, got }) => {
            assert_eq!(needed, 2);
            assert_eq!(got, 1);
        }
        other => panic!("Expected InsufficientData, got {:?}", other.map(|r| r.order)),
    }
}

#[test]
fn test_missing_time_column() {
    let dataset = Dataset::with_observations("Tanggal", "Jumlah Wisatawan", monthly_rows(12));
    let runner = ForecastRunner::new(FixedStore(dataset), "Bulan");

    let result = runner.run(&request(1));
    assert!(matches!(result, Err(ForecastError::MissingColumn(name)) if name == "Bulan"));
}

#[test]
fn test_unknown_value_column() {
    let runner = fixed_runner(monthly_rows(12));
    let request = ForecastRequest::new("Hotel Rooms", 1, 1, 1, 1).unwrap();

    let result = runner.run(&request);
    assert!(matches!(result, Err(ForecastError::UnknownColumn(name)) if name == "Hotel Rooms"));
}

#[test]
fn test_order_too_large_for_series() {
    let runner = fixed_runner(monthly_rows(4));
    let request = ForecastRequest::new("Jumlah Wisatawan", 3, 1, 3, 1).unwrap();

    assert!(matches!(runner.run(&request), Err(ForecastError::ModelError(_))));
}

#[test]
fn test_request_ranges() {
    assert!(ForecastRequest::new("x", 6, 5, 10, 100).is_ok());
    for (p, d, q, steps) in [(7, 1, 1, 1), (1, 6, 1, 1), (1, 1, 11, 1), (1, 1, 1, 101)] {
        assert!(matches!(
            ForecastRequest::new("x", p, d, q, steps),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_prepare_series_cleans_rows() {
    let rows = vec![
        Observation::new("2024-03", 30.0),
        Observation::new("2024-01", 10.0),
        Observation::new("not a month", 99.0),
        Observation::new("2024/02", 20.0),
        Observation::new("2024-01-15", 11.0),
        Observation {
            period: "2024-04".to_string(),
            value: None,
        },
    ];
    let dataset = Dataset::with_observations("Bulan", "Jumlah Wisatawan", rows);

    let (points, dropped) = prepare_series(&dataset, "Bulan", "Jumlah Wisatawan").unwrap();

    let expected = vec![
        (Month::new(2024, 1).unwrap(), 10.0),
        (Month::new(2024, 2).unwrap(), 20.0),
        (Month::new(2024, 3).unwrap(), 30.0),
    ];
    let actual: Vec<(Month, f64)> = points.iter().map(|p| (p.month, p.value)).collect();
    assert_eq!(actual, expected);
    assert_eq!(dropped, 3);
}

#[test]
fn test_runs_from_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Data_Wisata.csv");
    let mut csv = String::from("Bulan,Jumlah Wisatawan\n");
    for obs in monthly_rows(30) {
        csv.push_str(&format!("{},{}\n", obs.period, obs.value.unwrap()));
    }
    fs::write(&path, csv).unwrap();

    let runner = ForecastRunner::new(CsvDatasetStore::new(&path), "Bulan");
    let request = ForecastRequest::new("Jumlah Wisatawan", 2, 1, 0, 6).unwrap();
    let report = runner.run(&request).unwrap();

    assert_eq!(report.forecast.len(), 6);
    assert_eq!(report.dropped_rows, 0);
    assert_eq!(report.forecast_table().to_string().lines().count(), 7);
}

#[test]
fn test_missing_file_aborts_run() {
    let dir = TempDir::new().unwrap();
    let runner = ForecastRunner::new(CsvDatasetStore::new(dir.path().join("none.csv")), "Bulan");

    assert!(matches!(runner.run(&request(1)), Err(ForecastError::NotFound(_))));
}

#[test]
fn test_blank_row_does_not_hide_later_duplicate() {
    let rows = vec![
        Observation {
            period: "2024-01".to_string(),
            value: None,
        },
        Observation::new("2024-01", 10.0),
        Observation::new("2024-02", 20.0),
        Observation::new("2024-03", 30.0),
    ];
    let dataset = Dataset::with_observations("Bulan", "Jumlah Wisatawan", rows);

    let (points, dropped) = prepare_series(&dataset, "Bulan", "Jumlah Wisatawan").unwrap();

    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![10.0, 20.0, 30.0]);
    assert_eq!(points[0].month, Month::new(2024, 1).unwrap());
    assert_eq!(dropped, 1);
}

#[test]
fn test_time_column_in_second_position() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Data_Wisata.csv");
    let mut csv = String::from("Jumlah Wisatawan,Bulan\n");
    for obs in monthly_rows(24) {
        csv.push_str(&format!("{},{}\n", obs.value.unwrap(), obs.period));
    }
    fs::write(&path, csv).unwrap();

    let runner = ForecastRunner::new(CsvDatasetStore::new(&path), "Bulan");
    let report = runner.run(&request(2)).unwrap();

    assert_eq!(report.observed.len(), 24);
    assert_eq!(report.forecast[0].month.to_string(), "2023-01");
}
