//! Moving-average drift model

use crate::error::Result;
use crate::models::flat_default;
use crate::utils::{clamp_all, ForecastWindow};
use aqi_math::moving_averages::{adaptive_window, average_drift, simple_moving_average};

pub const MIN_POINTS: usize = 5;
/// Largest averaging window
pub const WINDOW: usize = 7;

/// Project the last moving average forward by the average drift of the
/// moving-average series.
///
/// The window is `n / 2`, capped at [`WINDOW`] and never below 3.
pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.len() < MIN_POINTS {
        return Ok(flat_default(window.days));
    }

    let ma_window = adaptive_window(values.len(), 2, WINDOW, 3);
    let averages = simple_moving_average(values, ma_window)?;
    let trend = average_drift(&averages);
    let last = averages.last().copied().unwrap_or_default();

    clamp_all((0..window.days).map(|i| last + trend * (i + 1) as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(days: usize) -> ForecastWindow {
        ForecastWindow::after(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), days)
    }

    #[test]
    fn test_flat_series_stays_flat() {
        let values = [42.0; 10];
        assert_eq!(predict(&values, window(4)).unwrap(), vec![42; 4]);
    }

    #[test]
    fn test_rising_series() {
        // window = 3, averages = [20, 30, 40], drift = 20 / 3
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(predict(&values, window(2)).unwrap(), vec![47, 53]);
    }

    #[test]
    fn test_below_minimum_is_flat() {
        assert_eq!(predict(&[10.0, 20.0, 30.0, 40.0], window(3)).unwrap(), vec![75; 3]);
    }
}
