//! Forecasting orchestrator
//!
//! [`ForecastingService`] picks a model by key, runs it, and attaches
//! confidence bands. It never fails: too little history or a model error
//! both end in a randomized default forecast flagged with low confidence.

use crate::config::ForecastConfig;
use crate::confidence;
use crate::data::{aqi_values, ConfidenceLevel, ForecastMetadata, HistoricalPoint, PredictionPoint};
use crate::models::{ForecastMethod, MethodInfo, STRATEGIES};
use crate::utils::{clamp_aqi, today, ForecastWindow};
use aqi_math::AQI_MIN;
use log::{debug, error, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Entries needed before any model is dispatched
pub const MIN_HISTORY: usize = 3;

/// Usable points above which a forecast is reported with high confidence
pub const HIGH_CONFIDENCE_POINTS: usize = 30;

/// Center of the randomized default forecast
pub const DEFAULT_BASE_AQI: i32 = 60;

/// Offset range added to [`DEFAULT_BASE_AQI`], inclusive
pub const DEFAULT_JITTER: (i32, i32) = (-15, 25);

const DEFAULT_MODEL: &str = "Default";
const DEFAULT_METHOD: &str = "default";

/// Selects, runs, and post-processes forecasting models
#[derive(Debug)]
pub struct ForecastingService {
    rng: Mutex<StdRng>,
}

impl ForecastingService {
    /// Service whose default forecasts draw from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Service with a reproducible random source
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_config(config: &ForecastConfig) -> Self {
        match config.forecasting.seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    /// Forecast `horizon` days starting tomorrow
    pub fn forecast_aqi(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
        method_key: &str,
    ) -> (Vec<PredictionPoint>, ForecastMetadata) {
        self.forecast_aqi_from(history, horizon, method_key, today())
    }

    /// Forecast `horizon` days starting the day after `today`
    pub fn forecast_aqi_from(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
        method_key: &str,
        today: chrono::NaiveDate,
    ) -> (Vec<PredictionPoint>, ForecastMetadata) {
        let window = ForecastWindow::after(today, horizon);
        let data_points = aqi_values(history).len();

        if history.len() < MIN_HISTORY {
            warn!(
                "Insufficient historical data ({} entries), using default forecast",
                history.len()
            );
            return (
                self.default_forecast(window),
                default_metadata(data_points, None),
            );
        }

        let method = ForecastMethod::resolve(method_key);
        if method.key() != method_key {
            debug!("Unknown method '{}', using {}", method_key, method);
        }

        match method.forecast_window(history, window) {
            Ok(predictions) => {
                let confidence = if data_points > HIGH_CONFIDENCE_POINTS {
                    ConfidenceLevel::High
                } else {
                    ConfidenceLevel::Medium
                };
                let metadata = ForecastMetadata {
                    model: method.spec().name.to_string(),
                    method: method.key().to_string(),
                    data_points,
                    confidence,
                    used_fallback: false,
                    error: None,
                };
                (confidence::attach(predictions, method.key()), metadata)
            }
            Err(e) => {
                error!("Forecasting error with {}: {}", method, e);
                (
                    self.default_forecast(window),
                    default_metadata(data_points, Some(e.to_string())),
                )
            }
        }
    }

    /// Keys of every registered method, in registry order
    pub fn available_methods(&self) -> Vec<&'static str> {
        STRATEGIES.iter().map(|spec| spec.method.key()).collect()
    }

    /// Introspection data for `key`, or `None` if no such method exists
    pub fn method_info(&self, key: &str) -> Option<MethodInfo> {
        key.parse::<ForecastMethod>()
            .ok()
            .map(|method| method.spec().info())
    }

    /// Moderate values with random variation, one per window day
    pub fn default_forecast(&self, window: ForecastWindow) -> Vec<PredictionPoint> {
        let (low, high) = DEFAULT_JITTER;
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        window
            .dates()
            .map(|date| {
                let value = DEFAULT_BASE_AQI + rng.gen_range(low..=high);
                let aqi = clamp_aqi(f64::from(value)).unwrap_or(AQI_MIN);
                PredictionPoint::new(date, aqi)
            })
            .collect()
    }
}

impl Default for ForecastingService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_metadata(data_points: usize, error: Option<String>) -> ForecastMetadata {
    ForecastMetadata {
        model: DEFAULT_MODEL.to_string(),
        method: DEFAULT_METHOD.to_string(),
        data_points,
        confidence: ConfidenceLevel::Low,
        used_fallback: true,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn history(values: &[u16]) -> Vec<HistoricalPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &aqi)| {
                HistoricalPoint::new(start + chrono::Duration::days(i as i64), aqi)
            })
            .collect()
    }

    #[test]
    fn test_default_forecast_stays_in_jitter_band() {
        let service = ForecastingService::with_seed(7);
        let predictions = service.default_forecast(ForecastWindow::after(today(), 200));

        assert_eq!(predictions.len(), 200);
        assert!(predictions
            .iter()
            .all(|p| (45..=85).contains(&p.predicted_aqi)));
    }

    #[test]
    fn test_seeded_services_agree() {
        let a = ForecastingService::with_seed(11);
        let b = ForecastingService::with_seed(11);
        let (pa, _) = a.forecast_aqi_from(&[], 10, "linear", today());
        let (pb, _) = b.forecast_aqi_from(&[], 10, "linear", today());
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_two_entries_take_default_path() {
        let service = ForecastingService::with_seed(1);
        let (predictions, meta) = service.forecast_aqi_from(&history(&[50, 60]), 3, "arima", today());

        assert_eq!(predictions.len(), 3);
        assert_eq!(meta.model, "Default");
        assert_eq!(meta.method, "default");
        assert_eq!(meta.confidence, ConfidenceLevel::Low);
        assert_eq!(meta.data_points, 2);
        assert!(predictions.iter().all(|p| p.confidence.is_none()));
    }

    #[test]
    fn test_unknown_method_resolves_to_ensemble() {
        let service = ForecastingService::with_seed(1);
        let (_, meta) = service.forecast_aqi_from(&history(&[50; 10]), 3, "prophet", today());

        assert_eq!(meta.method, "ensemble");
        assert_eq!(meta.model, "Ensemble (Multiple Models)");
        assert_eq!(meta.confidence, ConfidenceLevel::Medium);
        assert!(!meta.used_fallback);
    }

    #[test]
    fn test_missing_values_do_not_count_as_data_points() {
        let mut points = history(&[50; 31]);
        points.push(HistoricalPoint::missing(NaiveDate::from_ymd_opt(2024, 5, 5).unwrap()));

        let service = ForecastingService::with_seed(1);
        let (_, meta) = service.forecast_aqi_from(&points, 2, "linear", today());
        assert_eq!(meta.data_points, 31);
        assert_eq!(meta.confidence, ConfidenceLevel::High);
    }
}
