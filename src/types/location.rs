//! Geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(EngineError::InvalidCoordinate { field: "lat", value: self.lat });
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(EngineError::InvalidCoordinate { field: "lng", value: self.lng });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bounds() {
        assert!(GeoPoint::new(90.0, -180.0).validate().is_ok());
        assert!(GeoPoint::new(12.97, 77.59).validate().is_ok());

        assert_eq!(
            GeoPoint::new(90.5, 0.0).validate(),
            Err(EngineError::InvalidCoordinate { field: "lat", value: 90.5 })
        );
        assert!(matches!(
            GeoPoint::new(0.0, 181.0).validate(),
            Err(EngineError::InvalidCoordinate { field: "lng", .. })
        ));
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
    }
}
