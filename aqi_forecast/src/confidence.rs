//! Heuristic confidence bands around point forecasts
//!
//! The band width depends only on the method key that produced the forecast:
//! `margin = max(floor, aqi * pct)`. The 80% band is `aqi ± margin`, the 95%
//! band `aqi ± 1.5 * margin`, each bound rounded and clamped to the index
//! range.

use crate::data::{ConfidenceBounds, PredictionPoint};
use crate::models::ForecastMethod;
use aqi_math::{AQI_MAX, AQI_MIN};

/// Width of the 95% band relative to the 80% band
pub const WIDE_BAND_FACTOR: f64 = 1.5;

/// Band parameters for one method
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalPolicy {
    /// Smallest margin, in index points
    pub floor: f64,
    /// Margin as a fraction of the predicted value
    pub pct: f64,
}

impl IntervalPolicy {
    pub const ENSEMBLE: IntervalPolicy = IntervalPolicy {
        floor: 5.0,
        pct: 0.15,
    };
    pub const LINEAR: IntervalPolicy = IntervalPolicy {
        floor: 8.0,
        pct: 0.20,
    };
    pub const MOVING_AVERAGE: IntervalPolicy = IntervalPolicy {
        floor: 6.0,
        pct: 0.18,
    };
    /// Used for every other key, including unknown ones
    pub const WIDE: IntervalPolicy = IntervalPolicy {
        floor: 10.0,
        pct: 0.25,
    };

    pub fn margin(&self, aqi: u16) -> f64 {
        self.floor.max(f64::from(aqi) * self.pct)
    }

    /// Bands around a single predicted value
    pub fn bounds(&self, aqi: u16) -> ConfidenceBounds {
        let center = f64::from(aqi);
        let margin = self.margin(aqi);
        let wide = margin * WIDE_BAND_FACTOR;

        ConfidenceBounds::full(
            bound(center - margin),
            bound(center + margin),
            bound(center - wide),
            bound(center + wide),
        )
    }
}

fn bound(value: f64) -> u16 {
    value.round().clamp(f64::from(AQI_MIN), f64::from(AQI_MAX)) as u16
}

/// Policy for a method key
pub fn policy_for(method_key: &str) -> IntervalPolicy {
    match method_key.parse::<ForecastMethod>() {
        Ok(ForecastMethod::Ensemble) => IntervalPolicy::ENSEMBLE,
        Ok(ForecastMethod::Linear) => IntervalPolicy::LINEAR,
        Ok(ForecastMethod::MovingAverage) => IntervalPolicy::MOVING_AVERAGE,
        _ => IntervalPolicy::WIDE,
    }
}

/// Replace the confidence of every prediction with the bands for `method_key`
pub fn attach(predictions: Vec<PredictionPoint>, method_key: &str) -> Vec<PredictionPoint> {
    let policy = policy_for(method_key);
    predictions
        .into_iter()
        .map(|point| {
            let bounds = policy.bounds(point.predicted_aqi);
            point.with_confidence(bounds)
        })
        .collect()
}
