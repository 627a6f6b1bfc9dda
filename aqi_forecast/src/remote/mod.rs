//! Remote forecasting capability
//!
//! A [`RemoteForecaster`] receives the most recent usable AQI values and a
//! horizon, and answers with a [`RemoteForecast`]: a central array `y` plus
//! optional 80% and 95% bound arrays. Every failure is a [`RemoteError`];
//! the adapter turns all of them into a local fallback.

use crate::data::{ConfidenceBounds, PredictionPoint};
use crate::utils::{clamp_aqi, ForecastWindow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

mod openrouter;

pub use openrouter::OpenRouterClient;

/// Ways a remote forecast can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("no remote credential configured")]
    MissingCredential,

    #[error("insufficient history for remote forecast: {have} usable points, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote call timed out")]
    Timeout,

    #[error("remote rejected credential (HTTP {0})")]
    Unauthorized(u16),

    #[error("remote rate limit exceeded")]
    RateLimited,

    #[error("remote returned HTTP {0}")]
    Status(u16),

    #[error("remote response missing content")]
    MissingContent,

    #[error("malformed remote forecast: {0}")]
    Malformed(String),
}

/// Input sent to a remote forecaster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteRequest {
    /// Usable AQI values, oldest first
    pub history: Vec<f64>,
    pub horizon: usize,
}

impl RemoteRequest {
    /// Request carrying at most the `limit` most recent values
    pub fn new(values: &[f64], horizon: usize, limit: usize) -> Self {
        let start = values.len().saturating_sub(limit);
        Self {
            history: values[start..].to_vec(),
            horizon,
        }
    }
}

/// An injected remote forecasting service
#[async_trait]
pub trait RemoteForecaster: Send + Sync {
    async fn forecast(&self, request: &RemoteRequest) -> Result<RemoteForecast, RemoteError>;

    /// Label reported in forecast metadata
    fn model_name(&self) -> String;
}

/// Structured forecast returned by a remote forecaster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteForecast {
    pub forecast: ForecastArrays,
}

/// Central values and optional parallel bound arrays
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastArrays {
    pub y: Vec<f64>,
    #[serde(default)]
    pub y_80: Vec<f64>,
    #[serde(default)]
    pub y_80_hi: Vec<f64>,
    #[serde(default)]
    pub y_95: Vec<f64>,
    #[serde(default)]
    pub y_95_hi: Vec<f64>,
}

impl RemoteForecast {
    /// Parse the JSON document produced by the remote model.
    ///
    /// Models sometimes wrap their answer in a Markdown code fence; the fence
    /// is stripped before parsing.
    pub fn parse(content: &str) -> Result<Self, RemoteError> {
        serde_json::from_str(strip_code_fence(content))
            .map_err(|e| RemoteError::Malformed(e.to_string()))
    }

    /// Convert the first `window.days` entries into predictions.
    ///
    /// A bound pair is attached only where both of its arrays reach the day.
    pub fn into_predictions(self, window: ForecastWindow) -> Result<Vec<PredictionPoint>, RemoteError> {
        let arrays = self.forecast;
        if arrays.y.len() < window.days {
            return Err(RemoteError::Malformed(format!(
                "expected {} values, got {}",
                window.days,
                arrays.y.len()
            )));
        }

        window
            .dates()
            .enumerate()
            .map(|(i, date)| -> Result<PredictionPoint, RemoteError> {
                let aqi = to_aqi(arrays.y[i])?;
                let (low_80, high_80) = bound_pair(&arrays.y_80, &arrays.y_80_hi, i)?;
                let (low_95, high_95) = bound_pair(&arrays.y_95, &arrays.y_95_hi, i)?;
                let bounds = ConfidenceBounds {
                    low_80,
                    high_80,
                    low_95,
                    high_95,
                };
                Ok(PredictionPoint::new(date, aqi).with_confidence(bounds))
            })
            .collect()
    }
}

fn to_aqi(value: f64) -> Result<u16, RemoteError> {
    clamp_aqi(value).map_err(|e| RemoteError::Malformed(e.to_string()))
}

fn bound_pair(low: &[f64], high: &[f64], i: usize) -> Result<(Option<u16>, Option<u16>), RemoteError> {
    match (low.get(i), high.get(i)) {
        (Some(&lo), Some(&hi)) => Ok((Some(to_aqi(lo)?), Some(to_aqi(hi)?))),
        _ => Ok((None, None)),
    }
}

/// The assistant message text of a chat-completion response
pub fn extract_content(body: &Value) -> Result<&str, RemoteError> {
    body.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .ok_or(RemoteError::MissingContent)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
