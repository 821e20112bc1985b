//! Typed invalid-input conditions raised at the engine boundary.
//!
//! These carry no transport semantics; the HTTP layer decides how to render them.

use thiserror::Error;

use crate::types::ResourceType;

/// Structural input problems detected before any algorithm runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid coordinate for {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: f64 },

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Resource {id} has kind {kind}, which cannot be held in inventory")]
    InvalidResourceKind { id: String, kind: ResourceType },

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),
}

impl EngineError {
    /// Short machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidCoordinate { .. } => "INVALID_COORDINATE",
            Self::UnknownResourceType(_) => "UNKNOWN_RESOURCE_TYPE",
            Self::InvalidResourceKind { .. } => "INVALID_RESOURCE_KIND",
            Self::InvalidDataset(_) => "INVALID_DATASET",
        }
    }
}
