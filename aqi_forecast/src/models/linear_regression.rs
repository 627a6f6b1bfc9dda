//! Least-squares trend model

use crate::error::Result;
use crate::models::flat_default;
use crate::utils::{clamp_all, ForecastWindow};
use aqi_math::forecasting::LinearFit;
use aqi_math::MathError;
use log::debug;

pub const MIN_POINTS: usize = 3;

/// Extrapolate the least-squares line through `values` (indexed `0..n`) to
/// the indices `n..n + days`.
pub fn predict(values: &[f64], window: ForecastWindow) -> Result<Vec<u16>> {
    if values.len() < MIN_POINTS {
        return Ok(flat_default(window.days));
    }

    let fit = match LinearFit::fit(values) {
        Ok(fit) => fit,
        Err(MathError::CalculationError(reason)) => {
            debug!("Linear regression degenerate ({}), using default forecast", reason);
            return Ok(flat_default(window.days));
        }
        Err(e) => return Err(e.into()),
    };

    let n = values.len();
    clamp_all((0..window.days).map(|i| fit.predict((n + i) as f64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window(days: usize) -> ForecastWindow {
        ForecastWindow::after(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), days)
    }

    #[test]
    fn test_extends_a_perfect_line() {
        let values = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(predict(&values, window(3)).unwrap(), vec![50, 60, 70]);
    }

    #[test]
    fn test_short_input_is_flat() {
        assert_eq!(predict(&[90.0, 95.0], window(2)).unwrap(), vec![75, 75]);
    }

    #[test]
    fn test_steep_decline_clamps_at_zero() {
        let values = [100.0, 60.0, 20.0];
        assert_eq!(predict(&values, window(2)).unwrap(), vec![0, 0]);
    }
}
