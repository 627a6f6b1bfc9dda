//! Moving average and mean helpers
//!
//! Contains:
//! - Arithmetic means over a whole slice or its head/tail
//! - Simple Moving Average over every full window of a series

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Arithmetic mean of a slice
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the last `count` values, or of the whole slice when it is shorter
pub fn tail_mean(values: &[f64], count: usize) -> Result<f64> {
    mean(&values[values.len().saturating_sub(count)..])
}

/// Mean of the first `count` values, or of the whole slice when it is shorter
pub fn head_mean(values: &[f64], count: usize) -> Result<f64> {
    mean(&values[..count.min(values.len())])
}

/// Window size scaled to the series length: `n / divisor`, capped at `max`
/// and never below `min`.
pub fn adaptive_window(len: usize, divisor: usize, max: usize, min: usize) -> usize {
    (len / divisor.max(1)).min(max).max(min)
}

/// Simple Moving Average over every full window of `values`.
///
/// The result has `values.len() - window + 1` entries; entry `i` averages
/// `values[i..i + window]`.
pub fn simple_moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Not enough data for SMA calculation. Need {} values, have {}.",
            window,
            values.len()
        )));
    }

    let mut averages = Vec::with_capacity(values.len() - window + 1);
    let mut buffer = VecDeque::with_capacity(window);
    let mut sum = 0.0;

    for &value in values {
        buffer.push_back(value);
        sum += value;

        if buffer.len() > window {
            if let Some(old_value) = buffer.pop_front() {
                sum -= old_value;
            }
        }

        if buffer.len() == window {
            averages.push(sum / window as f64);
        }
    }

    Ok(averages)
}

/// Average per-step drift across a smoothed series: `(last - first) / len`.
/// Zero when fewer than two points are available.
pub fn average_drift(series: &[f64]) -> f64 {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 => (last - first) / series.len() as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_helpers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_relative_eq!(mean(&values).unwrap(), 3.5);
        assert_relative_eq!(tail_mean(&values, 2).unwrap(), 5.5);
        assert_relative_eq!(head_mean(&values, 2).unwrap(), 1.5);
        // Shorter than the requested count averages everything
        assert_relative_eq!(tail_mean(&values, 10).unwrap(), 3.5);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_simple_moving_average() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        let sma = simple_moving_average(&values, 3).unwrap();

        assert_eq!(sma.len(), 3);
        assert_relative_eq!(sma[0], 20.0);
        assert_relative_eq!(sma[1], 30.0);
        assert_relative_eq!(sma[2], 40.0);
    }

    #[test]
    fn test_simple_moving_average_rejects_bad_windows() {
        assert!(matches!(
            simple_moving_average(&[1.0, 2.0], 0),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            simple_moving_average(&[1.0, 2.0], 3),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_adaptive_window() {
        assert_eq!(adaptive_window(30, 2, 7, 3), 7);
        assert_eq!(adaptive_window(10, 2, 7, 3), 5);
        assert_eq!(adaptive_window(5, 2, 7, 3), 3);
        assert_eq!(adaptive_window(7, 3, 7, 3), 3);
    }

    #[test]
    fn test_average_drift() {
        assert_relative_eq!(average_drift(&[20.0, 30.0, 40.0]), 20.0 / 3.0);
        assert_eq!(average_drift(&[42.0]), 0.0);
        assert_eq!(average_drift(&[]), 0.0);
    }
}
