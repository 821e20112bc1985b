//! Volunteer ranking and grouping.
//!
//! Ranking scores every volunteer against a request:
//!
//! ```text
//! distance_score = max(0, 100 - km * 10)
//! skill_score    = 100 * |required ∩ skills| / max(|required|, 1)
//! availability   = 20 if available else 0
//! score          = 0.4 * distance_score + 0.4 * skill_score + 0.2 * availability
//! ```
//!
//! Grouping runs k-means over standardized `[lat, lng, skill_count]` and is
//! independent of ranking.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

use crate::config::defaults::{
    MATCH_AVAILABILITY_BONUS, MATCH_AVAILABILITY_WEIGHT, MATCH_DISTANCE_PENALTY_PER_KM,
    MATCH_DISTANCE_WEIGHT, MATCH_SKILL_WEIGHT, MIN_VOLUNTEERS_FOR_CLUSTERING,
};
use crate::config::MatcherConfig;
use crate::error::EngineError;
use crate::geo::haversine_km;
use crate::ml::{kmeans, KMeansParams, StandardScaler};
use crate::types::{ClusteredVolunteer, GeoPoint, MatchScore, Volunteer};

/// Inputs for one matching call. Absent lists are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchRequest {
    #[serde(default)]
    pub request_location: Option<GeoPoint>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub volunteers: Vec<Volunteer>,
}

/// Ranks and groups volunteers.
#[derive(Debug, Clone)]
pub struct VolunteerMatcher {
    config: MatcherConfig,
}

impl VolunteerMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Validate a match request and rank its volunteers.
    pub fn match_request(&self, request: &MatchRequest) -> Result<Vec<MatchScore>, EngineError> {
        let location = request
            .request_location
            .ok_or(EngineError::MissingField("request_location"))?;
        location.validate()?;
        validate_volunteers(&request.volunteers)?;

        Ok(self.rank(&location, &request.required_skills, &request.volunteers))
    }

    /// Score all volunteers, best first. Equal scores keep input order.
    pub fn rank(
        &self,
        location: &GeoPoint,
        required_skills: &[String],
        volunteers: &[Volunteer],
    ) -> Vec<MatchScore> {
        let required: BTreeSet<&str> = required_skills.iter().map(String::as_str).collect();

        let mut scores: Vec<MatchScore> = volunteers
            .iter()
            .map(|v| score_volunteer(location, &required, required_skills.len(), v))
            .collect();

        // `sort_by` is stable
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scores
    }

    /// Tag each volunteer with a cluster id.
    ///
    /// Pools smaller than three are returned untagged.
    pub fn cluster(&self, volunteers: Vec<Volunteer>) -> Result<Vec<ClusteredVolunteer>, EngineError> {
        validate_volunteers(&volunteers)?;

        if volunteers.len() < MIN_VOLUNTEERS_FOR_CLUSTERING {
            debug!(count = volunteers.len(), "Too few volunteers, skipping clustering");
            return Ok(volunteers
                .into_iter()
                .map(|volunteer| ClusteredVolunteer { volunteer, cluster: None })
                .collect());
        }

        let features: Vec<[f64; 3]> = volunteers
            .iter()
            .map(|v| [v.lat, v.lng, v.skills.len() as f64])
            .collect();

        let params = KMeansParams {
            k: self.config.max_clusters.min(volunteers.len()),
            max_iter: self.config.kmeans_max_iter,
            n_init: self.config.kmeans_n_init,
            tolerance: self.config.kmeans_tolerance,
            seed: self.config.random_seed,
        };

        let labels = StandardScaler::fit_transform(&features)
            .and_then(|(_, scaled)| kmeans::fit(&scaled, &params))
            .map(|fit| fit.labels);

        debug!(
            count = volunteers.len(),
            k = params.k,
            clustered = labels.is_some(),
            "Clustered volunteers"
        );

        Ok(volunteers
            .into_iter()
            .enumerate()
            .map(|(i, volunteer)| ClusteredVolunteer {
                volunteer,
                cluster: labels.as_ref().map(|l| l[i]),
            })
            .collect())
    }
}

fn validate_volunteers(volunteers: &[Volunteer]) -> Result<(), EngineError> {
    volunteers.iter().try_for_each(|v| v.location().validate())
}

/// `required_count` is the raw list length, duplicates included; only the
/// overlap uses set semantics.
fn score_volunteer(
    location: &GeoPoint,
    required: &BTreeSet<&str>,
    required_count: usize,
    volunteer: &Volunteer,
) -> MatchScore {
    let distance_km = haversine_km(location, &volunteer.location());
    let distance_score = (100.0 - distance_km * MATCH_DISTANCE_PENALTY_PER_KM).max(0.0);

    let held: BTreeSet<&str> = volunteer.skills.iter().map(String::as_str).collect();
    let skill_match = required.intersection(&held).count();
    let skill_score = 100.0 * skill_match as f64 / required_count.max(1) as f64;

    let availability = if volunteer.available { MATCH_AVAILABILITY_BONUS } else { 0.0 };

    let score = MATCH_DISTANCE_WEIGHT * distance_score
        + MATCH_SKILL_WEIGHT * skill_score
        + MATCH_AVAILABILITY_WEIGHT * availability;

    MatchScore {
        volunteer_id: volunteer.id.clone(),
        name: volunteer.name.clone(),
        score,
        distance_km,
        skill_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HQ: GeoPoint = GeoPoint::new(12.9716, 77.5946);

    fn volunteer(id: &str, lat: f64, lng: f64, skills: &[&str], available: bool) -> Volunteer {
        Volunteer {
            id: id.to_string(),
            name: format!("Volunteer {id}"),
            lat,
            lng,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            available,
        }
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn matcher() -> VolunteerMatcher {
        VolunteerMatcher::new(MatcherConfig::default())
    }

    #[test]
    fn test_ideal_volunteer_gets_top_weighted_score() {
        let v = volunteer("a", HQ.lat, HQ.lng, &["medical", "driving"], true);
        let ranked = matcher().rank(&HQ, &skills(&["medical", "driving"]), &[v]);
        // 0.4 * 100 + 0.4 * 100 + 0.2 * 20
        assert!((ranked[0].score - 84.0).abs() < 1e-9);
        assert_eq!(ranked[0].distance_km, 0.0);
        assert_eq!(ranked[0].skill_match, 2);
    }

    #[test]
    fn test_far_unavailable_unskilled_scores_zero() {
        let v = volunteer("far", 40.0, -74.0, &[], false);
        let ranked = matcher().rank(&HQ, &skills(&["medical"]), &[v]);
        assert_eq!(ranked[0].score, 0.0);
        assert!(ranked[0].distance_km > 10_000.0);
    }

    #[test]
    fn test_no_required_skills() {
        let v = volunteer("a", HQ.lat, HQ.lng, &["cooking"], false);
        let ranked = matcher().rank(&HQ, &[], &[v]);
        assert_eq!(ranked[0].skill_match, 0);
        assert!((ranked[0].score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_skill_overlap() {
        let v = volunteer("a", HQ.lat, HQ.lng, &["medical", "cooking", "medical"], false);
        let ranked = matcher().rank(&HQ, &skills(&["medical", "driving"]), &[v]);
        assert_eq!(ranked[0].skill_match, 1);
        // 0.4 * 100 + 0.4 * 50
        assert!((ranked[0].score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_required_skills_count_in_denominator() {
        let v = volunteer("a", HQ.lat, HQ.lng, &["medical"], false);
        let ranked = matcher().rank(&HQ, &skills(&["medical", "medical"]), &[v]);
        assert_eq!(ranked[0].skill_match, 1);
        // 0.4 * 100 + 0.4 * (100 * 1 / 2)
        assert!((ranked[0].score - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let pool = vec![
            volunteer("slow", HQ.lat, HQ.lng, &[], false),
            volunteer("best", HQ.lat, HQ.lng, &["rescue"], true),
            volunteer("tie", HQ.lat, HQ.lng, &[], false),
        ];
        let ranked = matcher().rank(&HQ, &skills(&["rescue"]), &pool);
        let ids: Vec<&str> = ranked.iter().map(|m| m.volunteer_id.as_str()).collect();
        assert_eq!(ids, vec!["best", "slow", "tie"]);
    }

    #[test]
    fn test_distance_penalty() {
        // 0.05 degrees of latitude is about 5.56 km
        let v = volunteer("a", HQ.lat + 0.05, HQ.lng, &[], false);
        let ranked = matcher().rank(&HQ, &[], &[v]);
        let expected = 0.4 * (100.0 - ranked[0].distance_km * 10.0);
        assert!((ranked[0].score - expected).abs() < 1e-9);
        assert!(ranked[0].distance_km > 5.5 && ranked[0].distance_km < 5.6);
    }

    #[test]
    fn test_match_request_requires_location() {
        let request = MatchRequest {
            request_location: None,
            required_skills: vec![],
            volunteers: vec![volunteer("a", 0.0, 0.0, &[], true)],
        };
        assert_eq!(
            matcher().match_request(&request),
            Err(EngineError::MissingField("request_location"))
        );
    }

    #[test]
    fn test_match_request_rejects_bad_coordinates() {
        let request = MatchRequest {
            request_location: Some(GeoPoint::new(95.0, 0.0)),
            ..MatchRequest::default()
        };
        assert!(matches!(
            matcher().match_request(&request),
            Err(EngineError::InvalidCoordinate { field: "lat", .. })
        ));

        let request = MatchRequest {
            request_location: Some(HQ),
            required_skills: vec![],
            volunteers: vec![volunteer("a", 0.0, 200.0, &[], true)],
        };
        assert!(matches!(
            matcher().match_request(&request),
            Err(EngineError::InvalidCoordinate { field: "lng", .. })
        ));
    }

    #[test]
    fn test_match_request_defaults_from_json() {
        let request: MatchRequest = serde_json::from_str(
            r#"{"request_location": {"lat": 1.0, "lng": 2.0},
                "volunteers": [{"id": "v1", "name": "Ravi", "lat": 1.0, "lng": 2.0}]}"#,
        )
        .unwrap();
        assert!(request.required_skills.is_empty());
        assert!(request.volunteers[0].skills.is_empty());
        assert!(!request.volunteers[0].available);

        let ranked = matcher().match_request(&request).unwrap();
        assert!((ranked[0].score - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_is_repeatable() {
        let pool = vec![
            volunteer("a", 13.0, 77.6, &["medical"], true),
            volunteer("b", 12.9, 77.5, &["driving"], false),
        ];
        let required = skills(&["medical"]);
        assert_eq!(matcher().rank(&HQ, &required, &pool), matcher().rank(&HQ, &required, &pool));
    }

    #[test]
    fn test_small_pool_is_not_clustered() {
        let pool = vec![volunteer("a", 1.0, 1.0, &[], true), volunteer("b", 2.0, 2.0, &[], true)];
        let out = matcher().cluster(pool.clone()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.cluster.is_none()));
        assert_eq!(out[0].volunteer, pool[0]);
    }

    #[test]
    fn test_cluster_groups_nearby_volunteers() {
        let pool = vec![
            volunteer("n1", 28.60, 77.20, &["medical"], true),
            volunteer("s1", 13.08, 80.27, &["cooking"], true),
            volunteer("n2", 28.61, 77.21, &["medical"], false),
            volunteer("w1", 19.07, 72.87, &["driving", "rescue", "first aid"], true),
            volunteer("s2", 13.09, 80.28, &["cooking"], false),
            volunteer("w2", 19.08, 72.88, &["driving", "rescue", "first aid"], true),
        ];
        let out = matcher().cluster(pool).unwrap();
        let label = |id: &str| out.iter().find(|c| c.volunteer.id == id).unwrap().cluster.unwrap();

        assert_eq!(label("n1"), label("n2"));
        assert_eq!(label("s1"), label("s2"));
        assert_eq!(label("w1"), label("w2"));
        assert_ne!(label("n1"), label("s1"));
        assert_ne!(label("n1"), label("w1"));
        assert_ne!(label("s1"), label("w1"));
        assert!(out.iter().all(|c| c.cluster.unwrap() < 3));
    }

    #[test]
    fn test_cluster_rejects_bad_coordinates() {
        let pool = vec![
            volunteer("a", 1.0, 1.0, &[], true),
            volunteer("b", f64::NAN, 2.0, &[], true),
            volunteer("c", 3.0, 3.0, &[], true),
        ];
        assert!(matcher().cluster(pool).is_err());
    }
}
