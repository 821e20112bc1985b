//! Relief Engine: decision support for disaster-relief coordination
//!
//! Four decision components sit behind a thin HTTP layer.
//!
//! ## Architecture
//!
//! - **Request Classifier**: keyword heuristic turning free text into
//!   resource type, urgency and quantity
//! - **Demand Forecaster**: per-type random-forest regression with a fixed
//!   fallback when untrained
//! - **Volunteer Matcher**: distance/skill/availability ranking plus k-means
//!   grouping
//! - **Resource Optimizer**: greedy per-request inventory allocation

pub mod config;
pub mod types;
pub mod error;
pub mod geo;
pub mod ml;
pub mod classifier;
pub mod forecast;
pub mod matching;
pub mod optimization;
pub mod analysis;
pub mod api;

// Re-export engine configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    AidRequest, Allocation, Classification, ClusteredVolunteer, DisasterAnalysis, Forecast,
    ForecastFeatures, GeoPoint, HistoricalRecord, MatchScore, Resource, ResourceType, RiskLevel,
    TrainingSummary, Urgency, Volunteer,
};

// Re-export components
pub use classifier::RequestClassifier;
pub use error::EngineError;
pub use forecast::{load_history, DatasetError, DemandForecaster};
pub use matching::{MatchRequest, VolunteerMatcher};
pub use optimization::{AllocationBatch, ResourceOptimizer};
pub use analysis::analyze_disaster;
