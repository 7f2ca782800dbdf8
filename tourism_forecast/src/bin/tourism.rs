//! # tourism
//!
//! Command-line front end: one subcommand per page.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tourism_forecast::config::AppConfig;
use tourism_forecast::views::{DataAction, ForecastArgs, Page, View};

#[derive(Parser)]
#[command(name = "tourism")]
#[command(about = "ARIMA forecasting of domestic tourist trips", long_about = None)]
#[command(version)]
struct Cli {
    /// Dataset CSV file (overrides the configuration)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the tool does
    Home,

    /// Show the dataset, optionally adding or deleting a row first
    Data {
        /// Append a row: month label (YYYY-MM) and tourist count
        #[arg(long, num_args = 2, value_names = ["PERIOD", "VALUE"], conflicts_with = "delete")]
        add: Option<Vec<String>>,

        /// Delete the row at this index
        #[arg(long, value_name = "INDEX", allow_hyphen_values = true)]
        delete: Option<String>,
    },

    /// Fit an ARIMA model and forecast the following months
    Forecast(ForecastCommand),
}

#[derive(Args)]
struct ForecastCommand {
    /// Column to forecast
    #[arg(long)]
    column: Option<String>,

    /// AR order (0-6)
    #[arg(short)]
    p: Option<usize>,

    /// Differencing order (0-5)
    #[arg(short)]
    d: Option<usize>,

    /// MA order (0-10)
    #[arg(short)]
    q: Option<usize>,

    /// Number of months to forecast (0-100)
    #[arg(long)]
    steps: Option<usize>,

    /// Directory for the SVG plots
    #[arg(long = "plots", value_name = "DIR")]
    plot_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Commands {
    fn into_view(self) -> View {
        match self {
            Commands::Home => View::Home,
            Commands::Data { add, delete } => {
                let action = match (add, delete) {
                    (Some(add), _) => match <[String; 2]>::try_from(add) {
                        Ok([period, value]) => DataAction::Add { period, value },
                        Err(_) => DataAction::Show,
                    },
                    (None, Some(index)) => DataAction::Delete { index },
                    (None, None) => DataAction::Show,
                };
                View::Data(action)
            }
            Commands::Forecast(cmd) => View::Forecast(ForecastArgs {
                column: cmd.column,
                p: cmd.p,
                d: cmd.d,
                q: cmd.q,
                steps: cmd.steps,
                plot_dir: cmd.plot_dir,
                json: cmd.json,
            }),
        }
    }
}

fn load_config(cli: &Cli) -> tourism_forecast::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err.user_message());
            return ExitCode::from(2);
        }
    };
    log::debug!("Using dataset {}", config.data_path.display());

    let view = cli.command.into_view();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match view.render(&config, &mut out).and_then(|_| out.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
