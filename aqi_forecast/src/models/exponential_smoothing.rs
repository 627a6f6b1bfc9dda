//! Exponential smoothing with a last-step trend

use crate::error::Result;
use crate::models::flat_default;
use crate::utils::{clamp_all, ForecastWindow};
use aqi_math::forecasting::exponential_smoothing;

pub const MIN_POINTS: usize = 3;
/// Smoothing factor
pub const ALPHA: f64 = 0.3;

pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.len() < MIN_POINTS {
        return Ok(flat_default(window.days));
    }

    let smoothed = exponential_smoothing(values, ALPHA)?;
    let (last, trend) = match smoothed.as_slice() {
        [.., previous, last] => (*last, last - previous),
        [last] => (*last, 0.0),
        [] => return Ok(flat_default(window.days)),
    };

    clamp_all((0..window.days).map(|i| last + trend * (i + 1) as f64))
}
