//! Error types for the aqi_forecast crate

use aqi_math::MathError;
use thiserror::Error;

/// Custom error types for the aqi_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Fewer usable points than an operation needs
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Input that leaves a model undefined, e.g. a zero-variance time index
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A model produced NaN or infinity
    #[error("Non-finite prediction: {0}")]
    NonFinite(f64),

    /// An ensemble member failed
    #[error("Sub-model {model} failed: {reason}")]
    SubModel { model: String, reason: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while reading CSV history
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the AQI math kernels
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
