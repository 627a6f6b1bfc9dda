use aqi_forecast::{ConfidenceLevel, ForecastingService, HistoricalPoint};
use chrono::{Duration, NaiveDate};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
}

fn history_from(values: &[u16]) -> Vec<HistoricalPoint> {
    let start = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &aqi)| HistoricalPoint::new(start + Duration::days(i as i64), aqi))
        .collect()
}

#[rstest]
#[case("ensemble")]
#[case("linear")]
#[case("seasonal")]
#[case("not_a_method")]
fn test_empty_history_gives_default_forecast(#[case] method: &str) {
    let service = ForecastingService::with_seed(3);
    let (predictions, metadata) = service.forecast_aqi_from(&[], 5, method, today());

    assert_eq!(predictions.len(), 5);
    assert_eq!(metadata.model, "Default");
    assert_eq!(metadata.method, "default");
    assert_eq!(metadata.confidence, ConfidenceLevel::Low);
    assert!(metadata.used_fallback);
    assert!(metadata.error.is_none());

    let tomorrow = today() + Duration::days(1);
    for (i, point) in predictions.iter().enumerate() {
        assert_eq!(point.date, tomorrow + Duration::days(i as i64));
        assert!((45..=85).contains(&point.predicted_aqi));
    }
}

#[test]
fn test_successful_forecast_carries_bands() {
    let series: Vec<u16> = (0..20).map(|i| 80 + (i % 4) * 5).collect();
    let service = ForecastingService::with_seed(3);
    let (predictions, metadata) =
        service.forecast_aqi_from(&history_from(&series), 7, "linear", today());

    assert_eq!(metadata.method, "linear");
    assert_eq!(metadata.model, "Linear Regression");
    assert_eq!(metadata.data_points, 20);
    assert_eq!(metadata.confidence, ConfidenceLevel::Medium);
    assert!(!metadata.used_fallback);

    for point in &predictions {
        let bands = point.confidence.expect("bands attached");
        let (low_80, high_80) = (bands.low_80.unwrap(), bands.high_80.unwrap());
        let (low_95, high_95) = (bands.low_95.unwrap(), bands.high_95.unwrap());

        assert!(low_95 <= low_80 && low_80 <= point.predicted_aqi);
        assert!(point.predicted_aqi <= high_80 && high_80 <= high_95);
        assert!(high_95 <= 500);
        // Linear bands are at least 8 points wide on each side
        assert!(high_80 - point.predicted_aqi >= 8);
    }
}

#[test]
fn test_long_history_is_high_confidence() {
    let service = ForecastingService::with_seed(3);
    let (_, metadata) =
        service.forecast_aqi_from(&history_from(&[70; 31]), 3, "arima", today());
    assert_eq!(metadata.confidence, ConfidenceLevel::High);

    let (_, metadata) =
        service.forecast_aqi_from(&history_from(&[70; 30]), 3, "arima", today());
    assert_eq!(metadata.confidence, ConfidenceLevel::Medium);
}

#[test]
fn test_available_methods_and_info() {
    let service = ForecastingService::with_seed(3);
    assert_eq!(
        service.available_methods(),
        vec![
            "linear",
            "moving_average",
            "exponential_smoothing",
            "seasonal",
            "arima",
            "ensemble"
        ]
    );

    let info = service.method_info("seasonal").unwrap();
    assert_eq!(info.name, "Seasonal Decomposition (period=7)");
    assert_eq!(info.min_data_points, 14);
    assert_eq!(info.best_for, "Data with weekly or seasonal patterns");

    assert!(service.method_info("prophet").is_none());
}

#[test]
fn test_metadata_json_shape() {
    let service = ForecastingService::with_seed(3);
    let (predictions, metadata) =
        service.forecast_aqi_from(&history_from(&[60; 10]), 2, "ensemble", today());

    let json = serde_json::to_value(&metadata).unwrap();
    assert_eq!(json["model"], "Ensemble (Multiple Models)");
    assert_eq!(json["confidence"], "medium");

    let point = serde_json::to_value(&predictions[0]).unwrap();
    assert_eq!(point["date"], "2024-09-16");
    assert_eq!(point["predicted_aqi"], 60);
    assert_eq!(point["category"], "Moderate");
    assert_eq!(point["confidence"]["low_80"], 51);
    assert_eq!(point["confidence"]["high_95"], 74);
}
