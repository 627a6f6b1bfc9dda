//! Utility functions for the aqi_forecast crate

use crate::data::PredictionPoint;
use crate::error::{ForecastError, Result};
use aqi_math::{AQI_MAX, AQI_MIN};
use chrono::{Days, NaiveDate, Utc};

/// The run of future days a forecast covers: `days` contiguous dates
/// starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastWindow {
    pub start: NaiveDate,
    pub days: usize,
}

impl ForecastWindow {
    /// Window starting the day after `today`
    pub fn after(today: NaiveDate, days: usize) -> Self {
        Self {
            start: today.checked_add_days(Days::new(1)).unwrap_or(today),
            days,
        }
    }

    /// Window starting tomorrow (UTC)
    pub fn from_tomorrow(days: usize) -> Self {
        Self::after(today(), days)
    }

    /// Date of the `offset`-th forecast day
    pub fn date(&self, offset: usize) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// All forecast dates, in order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days).map(move |offset| self.date(offset))
    }

    /// Attach this window's dates to a sequence of predicted values
    pub fn points(&self, values: &[u16]) -> Vec<PredictionPoint> {
        self.dates()
            .zip(values.iter())
            .map(|(date, &aqi)| PredictionPoint::new(date, aqi))
            .collect()
    }
}

/// Current UTC calendar date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Round a raw model output to the nearest integer and clamp it to the index
/// range. Non-finite values are rejected.
pub fn clamp_aqi(value: f64) -> Result<u16> {
    if !value.is_finite() {
        return Err(ForecastError::NonFinite(value));
    }

    Ok(value.round().clamp(f64::from(AQI_MIN), f64::from(AQI_MAX)) as u16)
}

/// Round and clamp a whole sequence of raw model outputs
pub fn clamp_all<I>(values: I) -> Result<Vec<u16>>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().map(clamp_aqi).collect()
}
