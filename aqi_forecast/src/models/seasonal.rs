//! Weekly seasonal decomposition
//!
//! The seasonal profile has one slot per position modulo [`SEASON_LENGTH`],
//! counted from the start of the series; it is not aligned to calendar
//! weekdays. Forecast days pick their slot by the weekday of the forecast
//! date (Monday = 0).

use crate::error::Result;
use crate::models::moving_average;
use crate::utils::{clamp_all, ForecastWindow};
use aqi_math::moving_averages::{head_mean, mean, tail_mean};
use chrono::Datelike;

/// Two full seasons
pub const MIN_POINTS: usize = 14;
pub const SEASON_LENGTH: usize = 7;

/// Below [`MIN_POINTS`] this model hands the whole forecast to the moving
/// average model.
pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.len() < MIN_POINTS {
        return moving_average::predict(values, window);
    }

    let profile = seasonal_profile(values)?;
    let profile_mean = mean(&profile)?;

    let base = tail_mean(values, SEASON_LENGTH)?;
    let trend = (base - head_mean(values, SEASON_LENGTH)?) / values.len() as f64;

    clamp_all(window.dates().enumerate().map(|(i, date)| {
        let slot = date.weekday().num_days_from_monday() as usize % SEASON_LENGTH;
        base + trend * (i + 1) as f64 + (profile[slot] - profile_mean)
    }))
}

/// Average of every value sharing a position modulo the season length
fn seasonal_profile(values: &[f64]) -> Result<Vec<f64>> {
    (0..SEASON_LENGTH)
        .map(|slot| {
            let slot_values: Vec<f64> = values
                .iter()
                .skip(slot)
                .step_by(SEASON_LENGTH)
                .copied()
                .collect();

            if slot_values.is_empty() {
                mean(values)
            } else {
                mean(&slot_values)
            }
        })
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Into::into)
}
