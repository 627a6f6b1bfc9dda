//! Forecasting models for daily AQI series
//!
//! The set of models is closed: each [`ForecastMethod`] variant is bound to a
//! [`StrategySpec`] holding its display data, minimum input size and the
//! prediction function that implements it. Dispatch goes through that table.
//!
//! Every model follows the same contract: given the usable AQI values of a
//! history (gap days dropped) and a [`ForecastWindow`], return exactly
//! `window.days` rounded, clamped index values. Input shorter than a model's
//! minimum yields the flat [`DEFAULT_AQI`] forecast.

use crate::data::{aqi_values, HistoricalPoint, PredictionPoint};
use crate::error::{ForecastError, Result};
use crate::utils::ForecastWindow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod arima;
pub mod ensemble;
pub mod exponential_smoothing;
pub mod linear_regression;
pub mod moving_average;
pub mod seasonal;

/// Value used for every day of a degenerate forecast ("Moderate")
pub const DEFAULT_AQI: u16 = 75;

/// Signature shared by every model implementation
pub type PredictFn = fn(&[f64], ForecastWindow) -> Result<Vec<u16>>;

/// Flat forecast used when a model cannot run on its input
pub fn flat_default(days: usize) -> Vec<u16> {
    vec![DEFAULT_AQI; days]
}

/// Keys of the available forecasting methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Linear,
    MovingAverage,
    ExponentialSmoothing,
    Seasonal,
    Arima,
    Ensemble,
}

impl ForecastMethod {
    /// Every method, in registry order
    pub const ALL: [ForecastMethod; 6] = [
        ForecastMethod::Linear,
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::Seasonal,
        ForecastMethod::Arima,
        ForecastMethod::Ensemble,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ForecastMethod::Linear => "linear",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::ExponentialSmoothing => "exponential_smoothing",
            ForecastMethod::Seasonal => "seasonal",
            ForecastMethod::Arima => "arima",
            ForecastMethod::Ensemble => "ensemble",
        }
    }

    /// Lenient lookup: unknown keys resolve to [`ForecastMethod::Ensemble`]
    pub fn resolve(key: &str) -> Self {
        key.parse().unwrap_or(ForecastMethod::Ensemble)
    }

    /// Registry entry for this method
    pub fn spec(&self) -> &'static StrategySpec {
        match self {
            ForecastMethod::Linear => &LINEAR,
            ForecastMethod::MovingAverage => &MOVING_AVERAGE,
            ForecastMethod::ExponentialSmoothing => &EXPONENTIAL_SMOOTHING,
            ForecastMethod::Seasonal => &SEASONAL,
            ForecastMethod::Arima => &ARIMA,
            ForecastMethod::Ensemble => &ENSEMBLE,
        }
    }

    /// Predict raw index values from usable AQI values
    pub fn predict(&self, values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
        (self.spec().predict)(values, window)
    }

    /// Forecast `days` days starting tomorrow
    pub fn forecast(&self, history: &[HistoricalPoint], days: usize) -> Result<Vec<PredictionPoint>> {
        self.forecast_window(history, ForecastWindow::from_tomorrow(days))
    }

    /// Forecast over an explicit window
    pub fn forecast_window(
        &self,
        history: &[HistoricalPoint],
        window: ForecastWindow,
    ) -> Result<Vec<PredictionPoint>> {
        let values = self.predict(&aqi_values(history), window)?;
        Ok(window.points(&values))
    }
}

impl FromStr for ForecastMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        ForecastMethod::ALL
            .iter()
            .copied()
            .find(|method| method.key() == s)
            .ok_or_else(|| ForecastError::InvalidParameter(format!("Unknown method: {}", s)))
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Registry entry binding a method to its implementation
#[derive(Debug)]
pub struct StrategySpec {
    pub method: ForecastMethod,
    /// Display name
    pub name: &'static str,
    pub description: &'static str,
    /// What kind of series the model suits
    pub best_for: &'static str,
    /// Usable points needed before the model runs
    pub min_points: usize,
    predict: PredictFn,
}

impl StrategySpec {
    pub fn info(&self) -> MethodInfo {
        MethodInfo {
            name: self.name.to_string(),
            description: self.description.to_string(),
            min_data_points: self.min_points,
            best_for: self.best_for.to_string(),
        }
    }
}

/// Introspection data for a method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub description: String,
    pub min_data_points: usize,
    pub best_for: String,
}

pub static LINEAR: StrategySpec = StrategySpec {
    method: ForecastMethod::Linear,
    name: "Linear Regression",
    description: "Linear trend-based forecasting using least squares regression",
    best_for: "Data with clear linear trends",
    min_points: linear_regression::MIN_POINTS,
    predict: linear_regression::predict,
};

pub static MOVING_AVERAGE: StrategySpec = StrategySpec {
    method: ForecastMethod::MovingAverage,
    name: "Moving Average (window=7)",
    description: "Smoothing-based forecasting using moving averages",
    best_for: "Data with noise that needs smoothing",
    min_points: moving_average::MIN_POINTS,
    predict: moving_average::predict,
};

pub static EXPONENTIAL_SMOOTHING: StrategySpec = StrategySpec {
    method: ForecastMethod::ExponentialSmoothing,
    name: "Exponential Smoothing (alpha=0.3)",
    description: "Weighted average forecasting with exponential decay",
    best_for: "Data with recent trends and patterns",
    min_points: exponential_smoothing::MIN_POINTS,
    predict: exponential_smoothing::predict,
};

pub static SEASONAL: StrategySpec = StrategySpec {
    method: ForecastMethod::Seasonal,
    name: "Seasonal Decomposition (period=7)",
    description: "Forecasting with seasonal pattern recognition",
    best_for: "Data with weekly or seasonal patterns",
    min_points: seasonal::MIN_POINTS,
    predict: seasonal::predict,
};

pub static ARIMA: StrategySpec = StrategySpec {
    method: ForecastMethod::Arima,
    name: "Simple ARIMA",
    description: "Autoregressive integrated moving average forecasting",
    best_for: "Time series with trends and autocorrelation",
    min_points: arima::MIN_POINTS,
    predict: arima::predict,
};

pub static ENSEMBLE: StrategySpec = StrategySpec {
    method: ForecastMethod::Ensemble,
    name: "Ensemble (Multiple Models)",
    description: "Combines multiple forecasting methods for improved accuracy",
    best_for: "General purpose forecasting with improved accuracy",
    min_points: ensemble::MIN_POINTS,
    predict: ensemble::predict,
};

/// The registry, in the order methods are listed to callers
pub static STRATEGIES: [&StrategySpec; 6] = [
    &LINEAR,
    &MOVING_AVERAGE,
    &EXPONENTIAL_SMOOTHING,
    &SEASONAL,
    &ARIMA,
    &ENSEMBLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_methods() {
        for (spec, method) in STRATEGIES.iter().zip(ForecastMethod::ALL) {
            assert_eq!(spec.method, method);
            assert_eq!(method.spec().name, spec.name);
        }
    }

    #[test]
    fn test_method_keys_round_trip() {
        for method in ForecastMethod::ALL {
            assert_eq!(method.key().parse::<ForecastMethod>().unwrap(), method);
        }
        assert!("holt_winters".parse::<ForecastMethod>().is_err());
    }

    #[test]
    fn test_unknown_keys_resolve_to_ensemble() {
        assert_eq!(ForecastMethod::resolve("prophet"), ForecastMethod::Ensemble);
        assert_eq!(ForecastMethod::resolve(""), ForecastMethod::Ensemble);
        assert_eq!(ForecastMethod::resolve("arima"), ForecastMethod::Arima);
    }
}
