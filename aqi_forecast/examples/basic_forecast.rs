use aqi_forecast::{ForecastMethod, ForecastingService, HistoryLoader, PredictionReport};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load data from CSV
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("daily_aqi.csv");

    println!("Loading data from: {}", csv_path.display());
    let history = HistoryLoader::from_csv(csv_path)?;
    println!("Loaded {} days of history", history.len());

    let service = ForecastingService::with_seed(42);

    // Compare every model over the next 5 days
    for method in ForecastMethod::ALL {
        let (predictions, metadata) = service.forecast_aqi(&history, 5, method.key());
        let values: Vec<u16> = predictions.iter().map(|p| p.predicted_aqi).collect();
        println!("{:<36} {:?} ({})", metadata.model, values, metadata.confidence);
    }

    // Full ensemble report with alerts above 100
    let (predictions, metadata) = service.forecast_aqi(&history, 7, "ensemble");
    let report = PredictionReport::build(predictions, metadata, 100);

    println!("\nEnsemble forecast:");
    for point in &report.predictions {
        println!("{}: {:>3} {}", point.date, point.predicted_aqi, point.category);
    }
    for alert in &report.alerts {
        println!("ALERT: {}", alert.message);
    }

    Ok(())
}
