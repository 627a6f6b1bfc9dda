//! AQI forecast command-line tool
//!
//! Reads a `date,aqi` CSV history and prints a prediction report as JSON.
//!
//! # Usage
//!
//! ```bash
//! aqi-forecast <history.csv> [horizon] [method|remote] [config.toml]
//! ```
//!
//! `method` is one of the local model keys (`linear`, `moving_average`,
//! `exponential_smoothing`, `seasonal`, `arima`, `ensemble`). `remote` asks
//! the remote forecaster first and falls back to the local ensemble.
//!
//! # Environment Variables
//!
//! - `OPENROUTER_API_KEY`: remote credential, overrides the config file
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{bail, Context};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use aqi_forecast::{AqiForecaster, ForecastConfig, ForecastingService, HistoryLoader, PredictionReport};

const DEFAULT_HORIZON: usize = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(history_path) = args.first() else {
        bail!("usage: aqi-forecast <history.csv> [horizon] [method|remote] [config.toml]");
    };

    let horizon = match args.get(1) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("invalid horizon: {}", raw))?,
        None => DEFAULT_HORIZON,
    };
    if horizon == 0 {
        bail!("horizon must be at least one day");
    }

    let config = match args.get(3) {
        Some(path) => ForecastConfig::from_file(path)?,
        None => ForecastConfig::default(),
    }
    .apply_env();

    let method = args
        .get(2)
        .cloned()
        .unwrap_or_else(|| config.forecasting.default_method.clone());

    let history = HistoryLoader::from_csv(history_path)
        .with_context(|| format!("failed to load history from {}", history_path))?;
    info!("Loaded {} historical points", history.len());

    let today = aqi_forecast::utils::today();
    let (predictions, metadata) = if method == "remote" {
        let forecaster = AqiForecaster::from_config(&config);
        forecaster.forecast_detailed_from(&history, horizon, today).await
    } else {
        let service = ForecastingService::from_config(&config);
        service.forecast_aqi_from(&history, horizon, &method, today)
    };

    info!(
        "Forecast produced by {} (confidence {}, fallback {})",
        metadata.model, metadata.confidence, metadata.used_fallback
    );

    let report = PredictionReport::build(predictions, metadata, config.alerts.threshold);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
