//! Shared data structures for relief coordination decisions
//!
//! This module defines the core types that flow through the engine:
//! - Categories: ResourceType (closed aid categories), Urgency
//! - Location: GeoPoint (validated WGS84 coordinate)
//! - Inputs: AidRequest, Resource, Volunteer, HistoricalRecord
//! - Outputs: Classification, Forecast, MatchScore, Allocation, DisasterAnalysis

mod category;
mod location;
mod inventory;
mod forecast;
mod outcome;

pub use category::*;
pub use location::*;
pub use inventory::*;
pub use forecast::*;
pub use outcome::*;
