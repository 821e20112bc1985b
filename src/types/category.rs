//! Closed category enums: aid resource types and urgency levels.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use crate::error::EngineError;

/// Aid category of a request or inventory item.
///
/// The set is closed: parsing never invents a new category.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    Food,
    Medical,
    Shelter,
    Water,
    Clothing,
    Rescue,
    General,
}

impl ResourceType {
    /// Types the demand forecaster keeps a model for, in reporting order.
    pub const FORECASTABLE: [ResourceType; 5] = [
        ResourceType::Food,
        ResourceType::Medical,
        ResourceType::Shelter,
        ResourceType::Water,
        ResourceType::Clothing,
    ];

    /// Types the text classifier scores, in tie-break priority order.
    pub const CLASSIFIABLE: [ResourceType; 6] = [
        ResourceType::Food,
        ResourceType::Medical,
        ResourceType::Shelter,
        ResourceType::Water,
        ResourceType::Clothing,
        ResourceType::Rescue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Food => "Food",
            ResourceType::Medical => "Medical",
            ResourceType::Shelter => "Shelter",
            ResourceType::Water => "Water",
            ResourceType::Clothing => "Clothing",
            ResourceType::Rescue => "Rescue",
            ResourceType::General => "General",
        }
    }

    /// Whether inventory of this kind can exist. Rescue is a service and
    /// General is the classifier's "no match" bucket.
    pub fn is_stockable(self) -> bool {
        !matches!(self, ResourceType::Rescue | ResourceType::General)
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = EngineError;

    /// Case-insensitive match against the known category names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [
            ResourceType::Food,
            ResourceType::Medical,
            ResourceType::Shelter,
            ResourceType::Water,
            ResourceType::Clothing,
            ResourceType::Rescue,
            ResourceType::General,
        ]
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| EngineError::UnknownResourceType(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ResourceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// How quickly a request must be served.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Keyword scan order: the first level with a hit wins.
    pub const PRECEDENCE: [Urgency; 4] =
        [Urgency::Critical, Urgency::High, Urgency::Medium, Urgency::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Medium
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
