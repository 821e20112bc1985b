//! Requests, inventory and volunteers as supplied by the coordinator.

use serde::{Deserialize, Serialize};

use super::{GeoPoint, ResourceType};

/// An outstanding aid request awaiting allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AidRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    /// Units requested; absent means nothing specific was asked for.
    #[serde(default)]
    pub quantity: u64,
    pub location: GeoPoint,
}

/// An inventory item available for allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    #[serde(default)]
    pub quantity: u64,
    pub location: GeoPoint,
}

/// A volunteer in the matching pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Volunteer {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub available: bool,
}

impl Volunteer {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}
