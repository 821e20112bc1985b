//! System-wide default constants.
//!
//! Fixed scoring weights, fallback values and keyword tables used by the
//! decision algorithms. Grouped by subsystem for easy discovery.

use crate::types::{ResourceType, Urgency};

// ============================================================================
// Request Classifier
// ============================================================================

/// Keyword lists per category, in tie-break priority order.
///
/// A category's hit count is the number of its keywords found as substrings
/// of the lower-cased text (each keyword counts at most once).
pub const CATEGORY_KEYWORDS: [(ResourceType, &[&str]); 6] = [
    (
        ResourceType::Food,
        &["food", "meal", "ration", "hunger", "eat", "bread", "rice", "wheat"],
    ),
    (
        ResourceType::Medical,
        &["medical", "medicine", "doctor", "hospital", "injury", "sick", "health", "first aid"],
    ),
    (
        ResourceType::Shelter,
        &["shelter", "tent", "house", "roof", "accommodation", "stay", "living"],
    ),
    (
        ResourceType::Water,
        &["water", "drink", "thirst", "clean water", "drinking water"],
    ),
    (
        ResourceType::Clothing,
        &["cloth", "clothes", "dress", "wear", "blanket", "winter"],
    ),
    (
        ResourceType::Rescue,
        &["rescue", "trapped", "stuck", "save", "emergency", "help"],
    ),
];

/// Urgency keyword lists, scanned in precedence order.
pub const URGENCY_KEYWORDS: [(Urgency, &[&str]); 4] = [
    (
        Urgency::Critical,
        &["urgent", "emergency", "critical", "immediately", "dying", "severe"],
    ),
    (Urgency::High, &["soon", "quickly", "asap", "important", "needed"]),
    (Urgency::Medium, &["need", "require", "want"]),
    (Urgency::Low, &["maybe", "if possible", "when available"]),
];

// ============================================================================
// Demand Forecaster
// ============================================================================

/// Confidence reported for predictions from a trained model.
pub const TRAINED_CONFIDENCE: f64 = 0.85;

/// Confidence reported for the untrained fallback.
pub const FALLBACK_CONFIDENCE: f64 = 0.70;

/// Fallback demand for a type with no trained model.
pub const fn default_demand(resource_type: ResourceType) -> u64 {
    match resource_type {
        ResourceType::Food => 800,
        ResourceType::Medical => 350,
        ResourceType::Shelter => 150,
        ResourceType::Water => 1200,
        ResourceType::Clothing => 250,
        ResourceType::Rescue | ResourceType::General => 500,
    }
}

/// Default affected area when the caller omits it.
pub const DEFAULT_AFFECTED_AREA: i64 = 5;

/// Default severity (1-5 scale) when the caller omits it.
pub const DEFAULT_SEVERITY: i64 = 3;

/// Number of forecasts reported as priority resources in a disaster analysis.
pub const PRIORITY_RESOURCE_COUNT: usize = 3;

// ============================================================================
// Volunteer Matcher
// ============================================================================

/// Distance score lost per kilometre (score = 100 - km * this).
pub const MATCH_DISTANCE_PENALTY_PER_KM: f64 = 10.0;

/// Bonus points for an available volunteer (before weighting).
pub const MATCH_AVAILABILITY_BONUS: f64 = 20.0;

pub const MATCH_DISTANCE_WEIGHT: f64 = 0.4;
pub const MATCH_SKILL_WEIGHT: f64 = 0.4;
pub const MATCH_AVAILABILITY_WEIGHT: f64 = 0.2;

/// Minimum pool size before clustering is attempted.
pub const MIN_VOLUNTEERS_FOR_CLUSTERING: usize = 3;

// ============================================================================
// Resource Optimizer
// ============================================================================

/// Base allocation score before distance and surplus adjustments.
pub const ALLOCATION_BASE_SCORE: f64 = 100.0;

/// Allocation score lost per kilometre.
pub const ALLOCATION_DISTANCE_PENALTY_PER_KM: f64 = 5.0;

/// Surplus units per bonus point.
pub const ALLOCATION_SURPLUS_DIVISOR: f64 = 10.0;

/// Cap on the surplus bonus.
pub const ALLOCATION_SURPLUS_BONUS_CAP: f64 = 20.0;

// ============================================================================
// Geometry
// ============================================================================

/// Mean Earth radius used by the haversine formula (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_demand_table() {
        assert_eq!(default_demand(ResourceType::Food), 800);
        assert_eq!(default_demand(ResourceType::Medical), 350);
        assert_eq!(default_demand(ResourceType::Shelter), 150);
        assert_eq!(default_demand(ResourceType::Water), 1200);
        assert_eq!(default_demand(ResourceType::Clothing), 250);
        assert_eq!(default_demand(ResourceType::Rescue), 500);
        assert_eq!(default_demand(ResourceType::General), 500);
    }

    #[test]
    fn test_keyword_tables_follow_priority_order() {
        let order: Vec<ResourceType> = CATEGORY_KEYWORDS.iter().map(|(t, _)| *t).collect();
        assert_eq!(order, ResourceType::CLASSIFIABLE.to_vec());

        let levels: Vec<Urgency> = URGENCY_KEYWORDS.iter().map(|(u, _)| *u).collect();
        assert_eq!(levels, Urgency::PRECEDENCE.to_vec());
    }

    #[test]
    fn test_match_weights_sum_to_one() {
        let sum = MATCH_DISTANCE_WEIGHT + MATCH_SKILL_WEIGHT + MATCH_AVAILABILITY_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
