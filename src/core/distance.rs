use serde::Deserialize;

/// Earth's radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Great-circle distance in kilometers
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Rectangular bounds of the serviceable territory
///
/// Submissions outside these bounds are rejected before any scoring runs.
/// Finer territory checks (reverse geocoding) belong to an external
/// collaborator; the bounds here are the cheap first gate.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Check that a coordinate pair is finite and inside the bounds
    #[inline]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        if !lat.is_finite() || !lng.is_finite() {
            return false;
        }
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        // National service area of the initial deployment
        Self {
            min_lat: 8.5,
            max_lat: 23.4,
            min_lng: 102.1,
            max_lng: 109.5,
        }
    }
}
