//! Weighted ensemble of the simpler models
//!
//! Each member is bound to its weight explicitly. For every forecast day the
//! ensemble averages the members that produced a value for that day, dividing
//! by the sum of *their* weights, so a missing member never drags the result
//! toward zero.

use crate::error::Result;
use crate::models::{flat_default, ForecastMethod, DEFAULT_AQI};
use crate::utils::{clamp_aqi, clamp_all, ForecastWindow};
use aqi_math::moving_averages::{head_mean, mean, tail_mean};
use log::warn;

pub const MIN_POINTS: usize = 3;

/// A model taking part in the ensemble and its vote weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnsembleMember {
    pub method: ForecastMethod,
    pub weight: f64,
}

/// Members and weights. Weights sum to 1.
pub const MEMBERS: [EnsembleMember; 4] = [
    EnsembleMember {
        method: ForecastMethod::Linear,
        weight: 0.30,
    },
    EnsembleMember {
        method: ForecastMethod::MovingAverage,
        weight: 0.25,
    },
    EnsembleMember {
        method: ForecastMethod::ExponentialSmoothing,
        weight: 0.25,
    },
    EnsembleMember {
        method: ForecastMethod::Seasonal,
        weight: 0.20,
    },
];

pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.len() < MIN_POINTS {
        return Ok(flat_default(window.days));
    }

    let outputs: Vec<(EnsembleMember, Vec<u16>)> = MEMBERS
        .iter()
        .filter_map(|member| match member.method.predict(values, window) {
            Ok(predictions) => Some((*member, predictions)),
            Err(e) => {
                warn!("Sub-model {} failed: {}", member.method, e);
                None
            }
        })
        .collect();

    if outputs.is_empty() {
        return mean_trend_forecast(values, window);
    }

    combine(&outputs, window.days)
}

/// Merge member outputs day by day.
///
/// A member contributes to day `i` only if its output reaches that day. Days
/// no member covers get [`DEFAULT_AQI`].
pub fn combine(outputs: &[(EnsembleMember, Vec<u16>)], days: usize) -> Result<Vec<u16>> {
    (0..days)
        .map(|day| {
            let votes: Vec<(f64, f64)> = outputs
                .iter()
                .filter_map(|(member, predictions)| {
                    predictions
                        .get(day)
                        .map(|&aqi| (member.weight, f64::from(aqi)))
                })
                .collect();

            match weighted_vote(&votes) {
                Some(value) => clamp_aqi(value),
                None => Ok(DEFAULT_AQI),
            }
        })
        .collect()
}

/// Weighted average of `(weight, value)` votes, renormalized over the votes
/// present. `None` when there are no votes or no positive weight.
pub fn weighted_vote(votes: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = votes.iter().map(|(weight, _)| weight).sum();
    if votes.is_empty() || total_weight <= 0.0 {
        return None;
    }

    let weighted_sum: f64 = votes.iter().map(|(weight, value)| weight * value).sum();
    Some(weighted_sum / total_weight)
}

/// Last-resort forecast when every member failed: overall mean plus a
/// first-week to last-week drift (zero for a week or less of data).
pub fn mean_trend_forecast(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.is_empty() {
        return Ok(flat_default(window.days));
    }

    let average = mean(values)?;
    let n = values.len();
    let trend = if n > 7 {
        (tail_mean(values, 7)? - head_mean(values, 7)?) / n as f64
    } else {
        0.0
    };

    clamp_all((0..window.days).map(|i| average + trend * (i + 1) as f64))
}
