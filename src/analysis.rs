//! Whole-disaster demand outlook built on the forecaster.

use tracing::debug;

use crate::config::defaults::PRIORITY_RESOURCE_COUNT;
use crate::forecast::DemandForecaster;
use crate::types::{DisasterAnalysis, Forecast, ForecastFeatures, RiskLevel};

/// Forecast every forecastable type for today and summarise risk.
pub fn analyze_disaster(forecaster: &DemandForecaster, affected_area: i64, severity: i64) -> DisasterAnalysis {
    analyze_with_features(forecaster, &ForecastFeatures::now(affected_area, severity))
}

/// Same as [`analyze_disaster`] with explicit calendar features.
pub fn analyze_with_features(forecaster: &DemandForecaster, features: &ForecastFeatures) -> DisasterAnalysis {
    let forecasts = forecaster.forecast_all(features);
    let total_predicted_demand: u64 = forecasts.iter().map(|f| f.predicted_demand).sum();
    let severity = features.severity;

    let mut priority: Vec<Forecast> = forecasts.clone();
    // Stable: equal demands keep forecast order
    priority.sort_by(|a, b| b.predicted_demand.cmp(&a.predicted_demand));
    priority.truncate(PRIORITY_RESOURCE_COUNT);

    let recommended_response_time = if severity >= 4 { "2-4 hours" } else { "4-8 hours" };
    let risk_level = RiskLevel::from_severity(severity);

    debug!(
        severity,
        risk = %risk_level,
        total_predicted_demand,
        "Disaster analysis complete"
    );

    DisasterAnalysis {
        forecasts,
        total_predicted_demand,
        risk_level,
        severity_score: severity,
        recommended_response_time: recommended_response_time.to_string(),
        priority_resources: priority,
    }
}
