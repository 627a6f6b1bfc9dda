//! # Airsight
//!
//! `airsight` bundles the AQI scale and the forecasting core.
//!
//! - [`scale`]: concentrations to index values and health categories
//! - [`forecast`]: models, the forecasting service, and the remote-or-fallback
//!   forecaster
//!
//! ## Example
//!
//! ```
//! use airsight::scale::{calculate_aqi, category_for, AqiCategory};
//!
//! assert_eq!(calculate_aqi(12.0, "pm25"), Some(50));
//! assert_eq!(calculate_aqi(-1.0, "pm25"), None);
//! assert_eq!(category_for(51), AqiCategory::Moderate);
//! ```

pub use aqi_forecast as forecast;
pub use aqi_math as scale;

pub use aqi_forecast::{
    AqiForecaster, ForecastConfig, ForecastMethod, ForecastingService, HistoricalPoint,
    PredictionPoint, PredictionReport,
};
pub use aqi_math::{calculate_aqi, calculate_daily_aqi, category_for, AqiCategory, Pollutant};
