//! Forecasting types: feature vectors, historical rows, forecasts and
//! disaster analysis summaries.

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::ResourceType;

/// Fixed forecast horizon label.
pub const FORECAST_TIMEFRAME: &str = "24h";

/// Number of regression features: [day_of_week, month, affected_area, severity].
pub const NUM_FORECAST_FEATURES: usize = 4;

/// Calendar and severity inputs for a demand prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastFeatures {
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u32,
    /// 1 = January .. 12 = December
    pub month: u32,
    pub affected_area: i64,
    pub severity: i64,
}

impl ForecastFeatures {
    /// Features for "today" on the local clock.
    pub fn now(affected_area: i64, severity: i64) -> Self {
        let today = Local::now();
        Self {
            day_of_week: today.weekday().num_days_from_monday(),
            month: today.month(),
            affected_area,
            severity,
        }
    }

    pub fn to_vector(&self) -> [f64; NUM_FORECAST_FEATURES] {
        [
            f64::from(self.day_of_week),
            f64::from(self.month),
            self.affected_area as f64,
            self.severity as f64,
        ]
    }
}

/// One historical demand observation used for training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalRecord {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub day_of_week: f64,
    pub month: f64,
    pub affected_area: f64,
    pub severity: f64,
    pub quantity: f64,
}

impl HistoricalRecord {
    pub fn features(&self) -> [f64; NUM_FORECAST_FEATURES] {
        [self.day_of_week, self.month, self.affected_area, self.severity]
    }

    /// All numeric fields finite and the target non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.features().iter().all(|v| v.is_finite())
            && self.quantity.is_finite()
            && self.quantity >= 0.0
    }
}

/// Predicted demand for one resource type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub resource_type: ResourceType,
    pub predicted_demand: u64,
    pub confidence: f64,
    pub timeframe: String,
}

/// Per-type result of one training call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeTrainingOutcome {
    pub resource_type: ResourceType,
    /// Rows of this type in the supplied dataset
    pub rows: usize,
    /// Whether a new model was fitted and published
    pub trained: bool,
}

/// Result of a training call across all forecastable types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSummary {
    pub total_rows: usize,
    pub outcomes: Vec<TypeTrainingOutcome>,
}

impl TrainingSummary {
    pub fn trained_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.trained).count()
    }
}

/// Whether a type currently has a published model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelStatus {
    pub resource_type: ResourceType,
    pub trained: bool,
    /// Rows the published model was fitted on
    pub training_rows: Option<usize>,
}
