//! Greedy per-request resource allocation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::defaults::{
    ALLOCATION_BASE_SCORE, ALLOCATION_DISTANCE_PENALTY_PER_KM, ALLOCATION_SURPLUS_BONUS_CAP,
    ALLOCATION_SURPLUS_DIVISOR,
};
use crate::error::EngineError;
use crate::geo::haversine_km;
use crate::types::{AidRequest, Allocation, Resource};

/// One allocation call's inputs. Absent lists are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AllocationBatch {
    #[serde(default)]
    pub requests: Vec<AidRequest>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Assigns inventory to requests one request at a time.
///
/// Resources are not reserved: one resource may be chosen for several
/// requests in the same batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceOptimizer;

impl ResourceOptimizer {
    pub fn new() -> Self {
        Self
    }

    /// Validate a batch, then allocate it.
    ///
    /// Every coordinate must be in range and every resource must be a
    /// stockable kind.
    pub fn allocate_batch(&self, batch: &AllocationBatch) -> Result<Vec<Allocation>, EngineError> {
        for request in &batch.requests {
            request.location.validate()?;
        }
        for resource in &batch.resources {
            if !resource.kind.is_stockable() {
                return Err(EngineError::InvalidResourceKind {
                    id: resource.id.clone(),
                    kind: resource.kind,
                });
            }
            resource.location.validate()?;
        }

        Ok(self.allocate(&batch.requests, &batch.resources))
    }

    /// Pick the best resource for each request, in request order.
    ///
    /// Candidates share the request's type and hold at least the requested
    /// quantity. Score = 100 - 5 * km + min(surplus / 10, 20); the first
    /// candidate with the strictly highest score wins. Requests without a
    /// candidate are skipped.
    pub fn allocate(&self, requests: &[AidRequest], resources: &[Resource]) -> Vec<Allocation> {
        let mut allocations = Vec::with_capacity(requests.len());

        for request in requests {
            let mut best: Option<(f64, &Resource, f64)> = None;

            for resource in resources
                .iter()
                .filter(|r| r.kind == request.kind && r.quantity >= request.quantity)
            {
                let distance_km = haversine_km(&request.location, &resource.location);
                let surplus = resource.quantity.saturating_sub(request.quantity) as f64;
                let score = ALLOCATION_BASE_SCORE - distance_km * ALLOCATION_DISTANCE_PENALTY_PER_KM
                    + (surplus / ALLOCATION_SURPLUS_DIVISOR).min(ALLOCATION_SURPLUS_BONUS_CAP);

                if best.map_or(true, |(top, _, _)| score > top) {
                    best = Some((score, resource, distance_km));
                }
            }

            match best {
                Some((match_score, resource, distance_km)) => allocations.push(Allocation {
                    request_id: request.id.clone(),
                    resource_id: resource.id.clone(),
                    match_score,
                    distance_km,
                }),
                None => debug!(
                    request_id = %request.id,
                    kind = %request.kind,
                    quantity = request.quantity,
                    "No resource can cover request, skipping"
                ),
            }
        }

        allocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeoPoint, ResourceType};

    const DEPOT: GeoPoint = GeoPoint::new(26.1445, 91.7362);

    fn request(id: &str, kind: ResourceType, quantity: u64, location: GeoPoint) -> AidRequest {
        AidRequest { id: id.to_string(), kind, quantity, location }
    }

    fn resource(id: &str, kind: ResourceType, quantity: u64, location: GeoPoint) -> Resource {
        Resource { id: id.to_string(), kind, quantity, location }
    }

    #[test]
    fn test_exact_colocated_match() {
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Food, 100, DEPOT)],
            &[resource("r1", ResourceType::Food, 100, DEPOT)],
        );
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].resource_id, "r1");
        assert_eq!(allocations[0].match_score, 100.0);
        assert_eq!(allocations[0].distance_km, 0.0);
    }

    #[test]
    fn test_skips_when_nothing_is_big_enough() {
        let allocations = ResourceOptimizer::new().allocate(
            &[
                request("big", ResourceType::Water, 5000, DEPOT),
                request("ok", ResourceType::Water, 10, DEPOT),
            ],
            &[resource("r1", ResourceType::Water, 4999, DEPOT)],
        );
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].request_id, "ok");
    }

    #[test]
    fn test_type_must_match() {
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Medical, 1, DEPOT)],
            &[resource("r1", ResourceType::Food, 1000, DEPOT)],
        );
        assert!(allocations.is_empty());
    }

    #[test]
    fn test_surplus_bonus_is_capped() {
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Shelter, 10, DEPOT)],
            &[resource("r1", ResourceType::Shelter, 10_000, DEPOT)],
        );
        assert_eq!(allocations[0].match_score, 120.0);

        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Shelter, 10, DEPOT)],
            &[resource("r1", ResourceType::Shelter, 60, DEPOT)],
        );
        assert_eq!(allocations[0].match_score, 105.0);
    }

    #[test]
    fn test_nearer_resource_wins() {
        let near = GeoPoint::new(DEPOT.lat + 0.01, DEPOT.lng);
        let far = GeoPoint::new(DEPOT.lat + 1.0, DEPOT.lng);
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Clothing, 50, DEPOT)],
            &[
                resource("far", ResourceType::Clothing, 50, far),
                resource("near", ResourceType::Clothing, 50, near),
            ],
        );
        assert_eq!(allocations[0].resource_id, "near");
        assert!(allocations[0].distance_km > 1.0 && allocations[0].distance_km < 1.2);
    }

    #[test]
    fn test_distant_candidate_still_emitted() {
        // A negative score is still the best available candidate
        let far = GeoPoint::new(DEPOT.lat + 1.0, DEPOT.lng);
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Food, 1, DEPOT)],
            &[resource("r1", ResourceType::Food, 1, far)],
        );
        assert_eq!(allocations.len(), 1);
        assert!(allocations[0].match_score < 0.0);
    }

    #[test]
    fn test_ties_keep_first_resource() {
        let allocations = ResourceOptimizer::new().allocate(
            &[request("q1", ResourceType::Food, 10, DEPOT)],
            &[
                resource("first", ResourceType::Food, 20, DEPOT),
                resource("second", ResourceType::Food, 20, DEPOT),
            ],
        );
        assert_eq!(allocations[0].resource_id, "first");
    }

    #[test]
    fn test_resources_are_not_reserved() {
        let allocations = ResourceOptimizer::new().allocate(
            &[
                request("q1", ResourceType::Water, 80, DEPOT),
                request("q2", ResourceType::Water, 80, DEPOT),
            ],
            &[resource("tank", ResourceType::Water, 100, DEPOT)],
        );
        let chosen: Vec<&str> = allocations.iter().map(|a| a.resource_id.as_str()).collect();
        assert_eq!(chosen, vec!["tank", "tank"]);
    }

    #[test]
    fn test_output_follows_request_order() {
        let allocations = ResourceOptimizer::new().allocate(
            &[
                request("c", ResourceType::Food, 1, DEPOT),
                request("a", ResourceType::Food, 1, DEPOT),
                request("b", ResourceType::Food, 1, DEPOT),
            ],
            &[resource("r", ResourceType::Food, 5, DEPOT)],
        );
        let ids: Vec<&str> = allocations.iter().map(|a| a.request_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_batch_rejects_unstockable_resource() {
        let batch = AllocationBatch {
            requests: vec![],
            resources: vec![resource("boat", ResourceType::Rescue, 1, DEPOT)],
        };
        assert_eq!(
            ResourceOptimizer::new().allocate_batch(&batch),
            Err(EngineError::InvalidResourceKind {
                id: "boat".to_string(),
                kind: ResourceType::Rescue
            })
        );
    }

    #[test]
    fn test_batch_rejects_bad_coordinates() {
        let batch = AllocationBatch {
            requests: vec![request("q1", ResourceType::Food, 1, GeoPoint::new(0.0, -181.0))],
            resources: vec![],
        };
        assert!(matches!(
            ResourceOptimizer::new().allocate_batch(&batch),
            Err(EngineError::InvalidCoordinate { field: "lng", .. })
        ));
    }

    #[test]
    fn test_batch_from_json_with_defaults() {
        let batch: AllocationBatch = serde_json::from_str(
            r#"{"requests": [{"id": "q1", "type": "food", "location": {"lat": 1.0, "lng": 1.0}}]}"#,
        )
        .unwrap();
        assert_eq!(batch.requests[0].quantity, 0);
        assert!(batch.resources.is_empty());
        assert!(ResourceOptimizer::new().allocate_batch(&batch).unwrap().is_empty());
    }
}
