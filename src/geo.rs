//! Great-circle distance between coordinates.

use crate::config::defaults::EARTH_RADIUS_KM;
use crate::types::GeoPoint;

/// Haversine distance between two points in kilometres.
///
/// Formula: a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2),
/// d = 2R · atan2(√a, √(1−a))
pub fn haversine_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
