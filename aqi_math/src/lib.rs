//! # AQI Math
//!
//! Air Quality Index calculations and the small time-series kernels used by
//! the forecasting models. Everything in this crate is pure and allocation-light:
//! no I/O, no shared state.

use thiserror::Error;

pub mod forecasting;
pub mod moving_averages;
pub mod scale;

pub use scale::{
    calculate_aqi, calculate_daily_aqi, category_for, is_alert_threshold_exceeded, AqiCategory,
    Breakpoint, DailyAqi, Pollutant, AQI_MAX, AQI_MIN,
};

/// Errors that can occur in AQI and series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for AQI math operations
pub type Result<T> = std::result::Result<T, MathError>;
