//! Historical measurements, predictions, and forecast metadata

use crate::error::Result;
use aqi_math::{category_for, AqiCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One day of measured history.
///
/// `aqi` is `None` when the day was recorded without a usable index value.
/// Missing days are simply absent from the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub aqi: Option<u16>,
}

impl HistoricalPoint {
    pub fn new(date: NaiveDate, aqi: u16) -> Self {
        Self {
            date,
            aqi: Some(aqi),
        }
    }

    /// A recorded day with no index value
    pub fn missing(date: NaiveDate) -> Self {
        Self { date, aqi: None }
    }
}

/// The usable index values of a history, in input order.
///
/// Points without a value are dropped, not interpolated.
pub fn aqi_values(history: &[HistoricalPoint]) -> Vec<f64> {
    history
        .iter()
        .filter_map(|point| point.aqi.map(f64::from))
        .collect()
}

/// Heuristic 80% and 95% bands around a predicted value.
///
/// Every bound is optional so that partially-covered remote forecasts can be
/// carried as-is; locally computed bands always fill all four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_80: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_80: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_95: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_95: Option<u16>,
}

impl ConfidenceBounds {
    /// Bands with all four bounds present
    pub fn full(low_80: u16, high_80: u16, low_95: u16, high_95: u16) -> Self {
        Self {
            low_80: Some(low_80),
            high_80: Some(high_80),
            low_95: Some(low_95),
            high_95: Some(high_95),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low_80.is_none()
            && self.high_80.is_none()
            && self.low_95.is_none()
            && self.high_95.is_none()
    }

    /// All bounds that are present
    pub fn bounds(&self) -> impl Iterator<Item = u16> {
        [self.low_80, self.high_80, self.low_95, self.high_95]
            .into_iter()
            .flatten()
    }
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub predicted_aqi: u16,
    pub category: AqiCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceBounds>,
}

impl PredictionPoint {
    /// Prediction whose category is derived from the value
    pub fn new(date: NaiveDate, predicted_aqi: u16) -> Self {
        Self {
            date,
            predicted_aqi,
            category: category_for(predicted_aqi),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: ConfidenceBounds) -> Self {
        self.confidence = (!confidence.is_empty()).then_some(confidence);
        self
    }
}

/// How much a forecast should be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        };
        f.write_str(label)
    }
}

/// Describes how a prediction list was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetadata {
    /// Display name of the model that produced the values
    pub model: String,
    /// Method key (`ensemble`, `linear`, ..., `default`, `remote`)
    pub method: String,
    /// Usable input points
    pub data_points: usize,
    pub confidence: ConfidenceLevel,
    pub used_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Loader for historical AQI series
#[derive(Debug)]
pub struct HistoryLoader;

impl HistoryLoader {
    /// Load `date,aqi` rows from a CSV file with a header.
    ///
    /// An empty `aqi` cell is read as a missing value.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalPoint>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load `date,aqi` rows from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<HistoricalPoint>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut history = Vec::new();
        for record in csv_reader.deserialize() {
            let point: HistoricalPoint = record?;
            history.push(point);
        }

        // Callers expect chronological order
        history.sort_by_key(|point| point.date);

        Ok(history)
    }
}
