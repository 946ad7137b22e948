//! Core traits for catalog access.
//!
//! The engine only reads through this interface. Implementations can be
//! in-memory, database-backed, or remote.

use std::sync::Arc;

use geo::Point;

use crate::models::schedule::PatternBook;
use crate::models::types::*;

/// Provider of all catalog data with lookup and query methods
pub trait CatalogProvider: Send + Sync {
    // ---- Collections ----

    /// Categories that have a collection, in load order.
    fn categories(&self) -> Vec<PlaceType>;

    /// Places of one category. Unknown categories yield an empty slice.
    fn places(&self, category: PlaceType) -> &[Arc<Place>];

    /// Every collection in load order, duplicates included.
    fn all_places(&self) -> Vec<Arc<Place>>;

    fn patterns(&self) -> &PatternBook;

    fn neighborhoods(&self) -> &[NeighborhoodDescriptor];

    // ---- Spatial queries ----

    /// Places whose main address lies within radius (kilometers)
    fn places_near(&self, point: Point, radius_km: f64) -> Vec<Arc<Place>>;

    /// The N places nearest to a point, closest first
    fn nearest_places(&self, point: Point, n: usize) -> Vec<Arc<Place>>;
}
