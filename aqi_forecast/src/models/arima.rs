//! Simple ARIMA-like trend and seasonal model

use crate::error::Result;
use crate::models::flat_default;
use crate::utils::{clamp_all, ForecastWindow};
use aqi_math::moving_averages::{adaptive_window, average_drift, mean, simple_moving_average, tail_mean};

pub const MIN_POINTS: usize = 7;
/// Largest averaging window
pub const WINDOW: usize = 7;

/// Extrapolate from the last observation using the drift of the `n / 3`
/// moving average, plus a week-over-week seasonal step once two weeks of data
/// exist. The seasonal step is scaled by `(i + 1) % 7` for the `i`-th day.
pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    let Some(&last) = values.last() else {
        return Ok(flat_default(window.days));
    };
    if values.len() < MIN_POINTS {
        return Ok(flat_default(window.days));
    }

    let ma_window = adaptive_window(values.len(), 3, WINDOW, 3);
    let averages = simple_moving_average(values, ma_window)?;
    let trend = average_drift(&averages);
    let seasonal = week_over_week(values)?;

    clamp_all((0..window.days).map(|i| {
        let step = (i + 1) as f64;
        last + trend * step + seasonal * ((i + 1) % 7) as f64
    }))
}

/// Mean of the last week minus mean of the week before; zero under 14 points
fn week_over_week(values: &[f64]) -> Result<f64> {
    let n = values.len();
    if n < 14 {
        return Ok(0.0);
    }

    Ok(tail_mean(values, 7)? - mean(&values[n - 14..n - 7])?)
}
