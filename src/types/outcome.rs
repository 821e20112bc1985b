//! Decision outputs: classifications, rankings, allocations, analyses.

use serde::{Deserialize, Serialize};

use super::{Forecast, ResourceType, Urgency, Volunteer};

/// Structured attributes extracted from free-text request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub resource_type: ResourceType,
    pub urgency: Urgency,
    pub quantity: Option<u64>,
    pub confidence: f64,
}

/// One volunteer's ranking against a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchScore {
    pub volunteer_id: String,
    pub name: String,
    /// Weighted composite, nominally 0-100
    pub score: f64,
    pub distance_km: f64,
    /// Number of required skills the volunteer has
    pub skill_match: usize,
}

/// A volunteer tagged with the group it was clustered into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteredVolunteer {
    #[serde(flatten)]
    pub volunteer: Volunteer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<usize>,
}

/// A request satisfied by an inventory item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Allocation {
    pub request_id: String,
    pub resource_id: String,
    pub match_score: f64,
    pub distance_km: f64,
}

/// Coarse risk rating derived from severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl RiskLevel {
    pub fn from_severity(severity: i64) -> Self {
        if severity >= 4 {
            RiskLevel::High
        } else if severity >= 3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Whole-disaster demand outlook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisasterAnalysis {
    pub forecasts: Vec<Forecast>,
    pub total_predicted_demand: u64,
    pub risk_level: RiskLevel,
    pub severity_score: i64,
    pub recommended_response_time: String,
    /// Top forecasts by predicted demand, highest first
    pub priority_resources: Vec<Forecast>,
}
