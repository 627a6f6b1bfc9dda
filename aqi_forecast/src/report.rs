//! Prediction reports with health alerts

use crate::confidence::IntervalPolicy;
use crate::data::{ForecastMetadata, PredictionPoint};
use aqi_math::{is_alert_threshold_exceeded, AqiCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A forecast day whose index exceeds the alert threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub date: NaiveDate,
    pub aqi: u16,
    pub category: AqiCategory,
    pub message: String,
}

impl Alert {
    fn for_prediction(point: &PredictionPoint) -> Self {
        Self {
            date: point.date,
            aqi: point.predicted_aqi,
            category: point.category,
            message: format!(
                "Predicted AQI {} ({}) on {}",
                point.predicted_aqi, point.category, point.date
            ),
        }
    }
}

/// Predictions, how they were made, and the alerts they raise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub predictions: Vec<PredictionPoint>,
    pub metadata: ForecastMetadata,
    pub threshold: u16,
    pub alerts: Vec<Alert>,
}

impl PredictionReport {
    /// Build a report.
    ///
    /// Predictions without bands get the ensemble bands. Every day strictly
    /// above `threshold` raises an alert.
    pub fn build(
        predictions: Vec<PredictionPoint>,
        metadata: ForecastMetadata,
        threshold: u16,
    ) -> Self {
        let predictions: Vec<PredictionPoint> = predictions
            .into_iter()
            .map(|point| match point.confidence {
                Some(_) => point,
                None => {
                    let bounds = IntervalPolicy::ENSEMBLE.bounds(point.predicted_aqi);
                    point.with_confidence(bounds)
                }
            })
            .collect();

        let alerts = predictions
            .iter()
            .filter(|point| is_alert_threshold_exceeded(point.predicted_aqi, threshold))
            .map(Alert::for_prediction)
            .collect();

        Self {
            predictions,
            metadata,
            threshold,
            alerts,
        }
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Highest predicted value, if any
    pub fn peak(&self) -> Option<&PredictionPoint> {
        self.predictions.iter().max_by_key(|point| point.predicted_aqi)
    }
}
