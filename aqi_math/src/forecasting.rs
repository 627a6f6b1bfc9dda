//! Trend estimators used by the forecasting models
//!
//! Contains:
//! - Ordinary least-squares line over an integer time index
//! - Recursive exponential smoothing

use crate::{MathError, Result};

/// Least-squares line `y = slope * x + intercept` fitted against the index
/// `x = 0..n-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
}

impl LinearFit {
    /// Fit a line through `values`, using each value's position as `x`.
    ///
    /// Fails with `CalculationError` when the index has no variance (a single
    /// point), since the slope is undefined.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a line through an empty series".to_string(),
            ));
        }

        let n = values.len() as f64;
        let x_mean = (0..values.len()).map(|i| i as f64).sum::<f64>() / n;
        let y_mean = values.iter().sum::<f64>() / n;

        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            numerator += (x - x_mean) * (y - y_mean);
            denominator += (x - x_mean) * (x - x_mean);
        }

        if denominator.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate slope: time index has zero variance".to_string(),
            ));
        }

        let slope = numerator / denominator;

        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    /// Value of the line at index `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Exponentially smoothed copy of `values`:
/// `s[0] = x[0]`, `s[i] = alpha * x[i] + (1 - alpha) * s[i - 1]`.
pub fn exponential_smoothing(values: &[f64], alpha: f64) -> Result<Vec<f64>> {
    if alpha <= 0.0 || alpha >= 1.0 {
        return Err(MathError::InvalidInput(
            "Alpha must be between 0 and 1 (exclusive)".to_string(),
        ));
    }

    let Some((&first, rest)) = values.split_first() else {
        return Err(MathError::InsufficientData(
            "No data available for exponential smoothing".to_string(),
        ));
    };

    let mut smoothed = Vec::with_capacity(values.len());
    smoothed.push(first);

    let mut level = first;
    for &value in rest {
        level = alpha * value + (1.0 - alpha) * level;
        smoothed.push(level);
    }

    Ok(smoothed)
}
