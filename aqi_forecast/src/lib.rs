//! # AQI Forecast
//!
//! Short-term Air Quality Index forecasting from sparse daily history.
//!
//! ## Features
//!
//! - Six interchangeable models: linear regression, moving average,
//!   exponential smoothing, seasonal decomposition, a simple ARIMA, and a
//!   weighted ensemble of the first four
//! - A forecasting service that selects a model by key, attaches heuristic
//!   confidence bands, and degrades to a default forecast instead of failing
//! - A remote-or-fallback forecaster that asks a remote model first and falls
//!   back to the local ensemble on any remote failure
//! - CSV history loading, TOML configuration, and prediction reports with
//!   threshold alerts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aqi_forecast::data::HistoryLoader;
//! use aqi_forecast::service::ForecastingService;
//!
//! let history = HistoryLoader::from_csv("history.csv")?;
//! let service = ForecastingService::new();
//!
//! let (predictions, metadata) = service.forecast_aqi(&history, 7, "ensemble");
//! for point in &predictions {
//!     println!("{}: {} ({})", point.date, point.predicted_aqi, point.category);
//! }
//! println!("model: {}, confidence: {}", metadata.model, metadata.confidence);
//! # Ok::<(), aqi_forecast::ForecastError>(())
//! ```
//!
//! Every forecast path returns exactly the requested number of days. Whether
//! a result is degraded shows only in [`ForecastMetadata`].

pub mod adapter;
pub mod confidence;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod remote;
pub mod report;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use crate::adapter::{AqiForecaster, ForecasterInfo};
pub use crate::config::ForecastConfig;
pub use crate::data::{
    ConfidenceBounds, ConfidenceLevel, ForecastMetadata, HistoricalPoint, HistoryLoader,
    PredictionPoint,
};
pub use crate::error::ForecastError;
pub use crate::models::{ForecastMethod, MethodInfo};
pub use crate::remote::{RemoteError, RemoteForecaster};
pub use crate::report::{Alert, PredictionReport};
pub use crate::service::ForecastingService;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
