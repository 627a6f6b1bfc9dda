use aqi_forecast::{AqiForecaster, ForecastConfig, ForecastError, ForecastingService};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[remote]
api_key = "sk-or-test"
timeout_secs = 15
history_limit = 60

[forecasting]
default_method = "seasonal"
seed = 7
local_models = false

[alerts]
threshold = 100
"#
    )
    .unwrap();

    let config = ForecastConfig::from_file(file.path()).unwrap();

    assert_eq!(config.remote.credential(), Some("sk-or-test"));
    assert_eq!(config.remote.timeout_secs, 15);
    assert_eq!(config.remote.history_limit, 60);
    assert_eq!(config.remote.min_history, 7);
    assert_eq!(config.remote.model, "deepseek/deepseek-chat-v3.1:free");
    assert_eq!(config.forecasting.default_method, "seasonal");
    assert_eq!(config.forecasting.seed, Some(7));
    assert!(!config.forecasting.local_models);
    assert_eq!(config.alerts.threshold, 100);
}

#[test]
fn test_missing_config_file() {
    let err = ForecastConfig::from_file("/nonexistent/forecast.toml").unwrap_err();
    assert!(matches!(err, ForecastError::Config(_)));
}

#[test]
fn test_credential_enables_remote() {
    let mut config = ForecastConfig::default();
    assert!(!AqiForecaster::from_config(&config).has_remote());

    config = config.with_api_key_override(Some("sk-or-test".to_string()));
    let forecaster = AqiForecaster::from_config(&config);
    assert!(forecaster.has_remote());
    assert_eq!(
        forecaster.forecast_metadata().model,
        "deepseek/deepseek-chat-v3.1:free (OpenRouter)"
    );
}

#[test]
fn test_seed_makes_defaults_reproducible() {
    let config = ForecastConfig::from_toml_str("[forecasting]\nseed = 5\n").unwrap();
    let a = ForecastingService::from_config(&config);
    let b = ForecastingService::from_config(&config);

    let (pa, _) = a.forecast_aqi(&[], 6, "ensemble");
    let (pb, _) = b.forecast_aqi(&[], 6, "ensemble");
    assert_eq!(pa, pb);
}
