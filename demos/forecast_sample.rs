use std::fs;
use tourism_arima_workspace::tourism_forecast::plots::render_report;
use tourism_arima_workspace::tourism_forecast::DatasetStore;
use tourism_arima_workspace::{CsvDatasetStore, DataEditor, ForecastRequest, ForecastRunner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Tourism Forecast: ARIMA Sample");
    println!("==============================\n");

    // Work on a scratch copy so the bundled dataset stays untouched
    let workdir = std::env::temp_dir().join("tourism_forecast_sample");
    fs::create_dir_all(&workdir)?;
    let data_path = workdir.join("Data_Wisata.csv");
    fs::write(&data_path, create_sample_csv())?;

    let store = CsvDatasetStore::new(&data_path);
    println!("Loaded {} rows from {}\n", store.load()?.len(), data_path.display());

    // Add the next month through the editor, then remove it again
    let editor = DataEditor::new(&store);
    let added = editor.add("2024-01", "2.150.000");
    println!("Add: {:?}", added.status);
    let last = added.dataset.map(|d| d.len() - 1).unwrap_or(0);
    let deleted = editor.delete(&last.to_string());
    println!("Delete: {:?}\n", deleted.status);

    let runner = ForecastRunner::new(&store, "Bulan");
    for (p, d, q) in [(1, 1, 1), (2, 1, 0), (1, 0, 1)] {
        let request = ForecastRequest::new("Jumlah Wisatawan", p, d, q, 6)?;
        let report = runner.run(&request)?;

        println!("ARIMA{}  AIC {:.2}", report.order, report.summary.aic);
        print!("{}", report.forecast_table());
        if let Some(metrics) = &report.metrics {
            println!("{}", metrics);
        }
        println!();

        if (p, d, q) == (1, 1, 1) {
            let files = render_report(&report, &workdir.join("plots"))?;
            println!("Forecast plot written to {}\n", files.forecast.display());
        }
    }

    Ok(())
}

fn create_sample_csv() -> String {
    let mut csv = String::from("Bulan,Jumlah Wisatawan\n");
    for i in 0..48u32 {
        let year = 2020 + i / 12;
        let month = i % 12 + 1;
        let season = (2.0 * std::f64::consts::PI * f64::from(month - 1) / 12.0).sin();
        let value = 1_900_000.0 + 8_000.0 * f64::from(i) + 180_000.0 * season;
        csv.push_str(&format!("{:04}-{:02},{:.0}\n", year, month, value));
    }
    csv
}
