//! Remote-or-fallback forecasting
//!
//! [`AqiForecaster`] tries the remote forecaster once and falls back to the
//! local ensemble on any failure. Without local models it degrades further
//! to a simple trend forecast. It always returns `horizon` predictions.

use crate::config::{ForecastConfig, RemoteSettings};
use crate::data::{aqi_values, ConfidenceLevel, ForecastMetadata, HistoricalPoint, PredictionPoint};
use crate::models::{flat_default, ForecastMethod, STRATEGIES};
use crate::remote::{OpenRouterClient, RemoteError, RemoteForecaster, RemoteRequest};
use crate::service::ForecastingService;
use crate::utils::{clamp_aqi, today, ForecastWindow};
use aqi_math::moving_averages::mean;
use chrono::NaiveDate;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Relative jitter applied to each day of the trend fallback
pub const TREND_JITTER: f64 = 0.1;

const REMOTE_METHOD: &str = "remote";
const TREND_MODEL: &str = "Trend Fallback";
const TREND_METHOD: &str = "trend";
const LOCAL_MODEL_LABEL: &str = "Enhanced Ensemble Forecasting";

/// Describes which forecaster will serve requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecasterInfo {
    pub model: String,
    pub api_available: bool,
    pub fallback_used: bool,
    /// Local model names, listed only when the remote path is off
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

/// Forecaster that prefers a remote model and falls back to local ones
pub struct AqiForecaster {
    remote: Option<Arc<dyn RemoteForecaster>>,
    local: Option<ForecastingService>,
    settings: RemoteSettings,
    timeout: Duration,
    rng: Mutex<StdRng>,
}

impl AqiForecaster {
    /// Forecaster using the OpenRouter client when a credential is configured
    pub fn from_config(config: &ForecastConfig) -> Self {
        let remote: Option<Arc<dyn RemoteForecaster>> = match OpenRouterClient::new(&config.remote) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                warn!("Remote forecaster disabled: {}", e);
                None
            }
        };

        let local = config
            .forecasting
            .local_models
            .then(|| ForecastingService::from_config(config));

        let rng = match config.forecasting.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            remote,
            local,
            settings: config.remote.clone(),
            timeout: Duration::from_secs(config.remote.timeout_secs),
            rng: Mutex::new(rng),
        }
    }

    /// Replace the remote capability
    pub fn with_remote(mut self, remote: Arc<dyn RemoteForecaster>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn without_remote(mut self) -> Self {
        self.remote = None;
        self
    }

    /// Replace the local orchestrator; `None` leaves only the trend fallback
    pub fn with_local(mut self, local: Option<ForecastingService>) -> Self {
        self.local = local;
        self
    }

    /// Bound on a single remote call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Forecast `horizon` days from tomorrow. The flag is true unless the
    /// remote forecaster produced the result.
    pub async fn forecast_aqi(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
    ) -> (Vec<PredictionPoint>, bool) {
        self.forecast_aqi_from(history, horizon, today()).await
    }

    /// Same as [`AqiForecaster::forecast_aqi`]
    pub async fn forecast_or_fallback(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
    ) -> (Vec<PredictionPoint>, bool) {
        self.forecast_aqi(history, horizon).await
    }

    pub async fn forecast_aqi_from(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
        today: NaiveDate,
    ) -> (Vec<PredictionPoint>, bool) {
        let (predictions, metadata) = self.forecast_detailed_from(history, horizon, today).await;
        (predictions, metadata.used_fallback)
    }

    /// Forecast with full metadata. A fallback carries the remote failure
    /// reason in `metadata.error`.
    pub async fn forecast_detailed_from(
        &self,
        history: &[HistoricalPoint],
        horizon: usize,
        today: NaiveDate,
    ) -> (Vec<PredictionPoint>, ForecastMetadata) {
        let window = ForecastWindow::after(today, horizon);
        let values = aqi_values(history);

        match self.try_remote(&values, window).await {
            Ok((predictions, model)) => {
                info!("Remote forecast succeeded with {}", model);
                let metadata = ForecastMetadata {
                    model,
                    method: REMOTE_METHOD.to_string(),
                    data_points: values.len(),
                    confidence: ConfidenceLevel::Medium,
                    used_fallback: false,
                    error: None,
                };
                (predictions, metadata)
            }
            Err(reason) => {
                match reason {
                    RemoteError::MissingCredential | RemoteError::InsufficientHistory { .. } => {
                        warn!("{}, using fallback forecast", reason)
                    }
                    _ => warn!("Remote forecast failed ({}), using fallback forecast", reason),
                }
                self.fallback(history, &values, window, today, reason)
            }
        }
    }

    async fn try_remote(
        &self,
        values: &[f64],
        window: ForecastWindow,
    ) -> Result<(Vec<PredictionPoint>, String), RemoteError> {
        let remote = self.remote.as_ref().ok_or(RemoteError::MissingCredential)?;

        if values.len() < self.settings.min_history {
            return Err(RemoteError::InsufficientHistory {
                have: values.len(),
                need: self.settings.min_history,
            });
        }

        let request = RemoteRequest::new(values, window.days, self.settings.history_limit);
        let forecast = tokio::time::timeout(self.timeout, remote.forecast(&request))
            .await
            .map_err(|_| RemoteError::Timeout)??;

        let predictions = forecast.into_predictions(window)?;
        Ok((predictions, remote.model_name()))
    }

    fn fallback(
        &self,
        history: &[HistoricalPoint],
        values: &[f64],
        window: ForecastWindow,
        today: NaiveDate,
        reason: RemoteError,
    ) -> (Vec<PredictionPoint>, ForecastMetadata) {
        let (predictions, mut metadata) = match &self.local {
            Some(service) => {
                let result = service.forecast_aqi_from(
                    history,
                    window.days,
                    ForecastMethod::Ensemble.key(),
                    today,
                );
                info!("Using local forecasting: {}", result.1.model);
                result
            }
            None => {
                warn!("Local models unavailable, using trend fallback");
                let predictions = self.trend_forecast(values, window);
                let metadata = ForecastMetadata {
                    model: TREND_MODEL.to_string(),
                    method: TREND_METHOD.to_string(),
                    data_points: values.len(),
                    confidence: ConfidenceLevel::Low,
                    used_fallback: true,
                    error: None,
                };
                (predictions, metadata)
            }
        };

        metadata.used_fallback = true;
        if metadata.error.is_none() {
            metadata.error = Some(reason.to_string());
        }
        (predictions, metadata)
    }

    /// Minimal trend forecast.
    ///
    /// Base is the mean of the last 7 values; the daily trend is the change
    /// between that mean and the mean of the 7 values before it, divided by
    /// 7. Each day gets up to ±10% uniform jitter. No values at all gives a
    /// flat moderate forecast.
    pub fn trend_forecast(&self, values: &[f64], window: ForecastWindow) -> Vec<PredictionPoint> {
        let Some((recent, trend)) = trend_baseline(values) else {
            return window.points(&flat_default(window.days));
        };

        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let predicted: Vec<u16> = (0..window.days)
            .map(|i| {
                let base = recent + trend * i as f64;
                let variation = rng.gen_range(-TREND_JITTER..=TREND_JITTER);
                clamp_aqi(base * (1.0 + variation)).unwrap_or(crate::models::DEFAULT_AQI)
            })
            .collect();

        window.points(&predicted)
    }

    /// Which forecaster serves requests
    pub fn forecast_metadata(&self) -> ForecasterInfo {
        match &self.remote {
            Some(remote) => ForecasterInfo {
                model: remote.model_name(),
                api_available: true,
                fallback_used: false,
                methods: Vec::new(),
            },
            None => ForecasterInfo {
                model: LOCAL_MODEL_LABEL.to_string(),
                api_available: false,
                fallback_used: true,
                methods: STRATEGIES
                    .iter()
                    .map(|spec| spec.name.to_string())
                    .collect(),
            },
        }
    }
}

/// Recent mean and daily trend, or `None` with no values
fn trend_baseline(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n >= 7 {
        let recent = mean(&values[n - 7..]).ok()?;
        let older = if n >= 14 {
            mean(&values[n - 14..n - 7]).ok()?
        } else {
            recent
        };
        Some((recent, (recent - older) / 7.0))
    } else {
        mean(values).ok().map(|recent| (recent, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trend_baseline() {
        assert_eq!(trend_baseline(&[]), None);

        let (recent, trend) = trend_baseline(&[40.0, 60.0]).unwrap();
        assert_relative_eq!(recent, 50.0);
        assert_relative_eq!(trend, 0.0);

        let week = [70.0; 10];
        assert_eq!(trend_baseline(&week), Some((70.0, 0.0)));

        let mut two_weeks = vec![50.0; 7];
        two_weeks.extend([64.0; 7]);
        let (recent, trend) = trend_baseline(&two_weeks).unwrap();
        assert_relative_eq!(recent, 64.0);
        assert_relative_eq!(trend, 2.0);
    }
}
