//! Spatial query utilities for distance calculations.
//!
//! Uses the Haversine formula (mean Earth radius) for straight-line distances.

use geo::{HaversineDistance, Point};

/// Mean Earth radius, the one `geo`'s haversine uses.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

// Headroom so points right on the circle survive the degree-space pre-filter
const SEARCH_MARGIN: f64 = 1.01;

/// Haversine distance between two points in kilometers
pub fn haversine_distance_km(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2) / 1000.0
}

/// Haversine distance between two latitude/longitude pairs in kilometers
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_distance_km(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Whether a point is a usable place location.
///
/// (0, 0) is the data layer's "no location" sentinel, not a place in the catalog.
pub fn is_locatable(point: Point) -> bool {
    let (lon, lat) = (point.x(), point.y());
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
        && !(lat == 0.0 && lon == 0.0)
}

/// Euclidean search radius in degrees that covers `radius_km` around `center`.
///
/// Longitude degrees shrink with latitude, so the radius is widened by the
/// cosine of the highest latitude the circle can reach.
pub fn search_radius_degrees(center: Point, radius_km: f64) -> f64 {
    let lat_span = radius_km / KM_PER_DEGREE * SEARCH_MARGIN;
    let max_lat = (center.y().abs() + lat_span).min(89.0);
    lat_span / max_lat.to_radians().cos()
}
