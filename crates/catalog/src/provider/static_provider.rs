//! In-memory catalog provider.
//!
//! Stores every collection as loaded, plus a spatial index over main-address
//! locations for radius and nearest queries.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::models::{schedule::PatternBook, traits::*, types::*};
use crate::spatial::index::PlaceNode;
use crate::spatial::queries::{haversine_distance_km, search_radius_degrees};

/// In-memory catalog provider with spatial indexing
///
/// Collections are read-only snapshots; places are shared through `Arc`s.
#[derive(Clone)]
pub struct StaticCatalogProvider {
    // Core data
    collections: Vec<CategoryCollection>,
    patterns: PatternBook,
    neighborhoods: Vec<NeighborhoodDescriptor>,

    // Lookup maps
    category_map: HashMap<PlaceType, usize>,

    // Spatial index
    place_tree: RTree<PlaceNode>,
}

impl StaticCatalogProvider {
    /// Create a new empty provider
    pub fn new() -> Self {
        Self {
            collections: Vec::new(),
            patterns: PatternBook::new(),
            neighborhoods: Vec::new(),
            category_map: HashMap::new(),
            place_tree: RTree::new(),
        }
    }

    /// Build provider from already-typed collections.
    ///
    /// Collections sharing a category are concatenated in order.
    pub fn from_data(
        collections: Vec<CategoryCollection>,
        patterns: PatternBook,
        neighborhoods: Vec<NeighborhoodDescriptor>,
    ) -> Self {
        let mut merged: Vec<CategoryCollection> = Vec::new();
        let mut category_map = HashMap::new();

        for collection in collections {
            match category_map.get(&collection.category) {
                Some(&index) => {
                    let existing: &mut CategoryCollection = &mut merged[index];
                    existing.places.extend(collection.places);
                }
                None => {
                    category_map.insert(collection.category, merged.len());
                    merged.push(collection);
                }
            }
        }

        // Places without a real location are left out of the index
        let nodes: Vec<PlaceNode> = merged
            .iter()
            .flat_map(|c| c.places.iter())
            .filter_map(PlaceNode::for_place)
            .collect();

        let indexed = nodes.len();
        let place_tree = RTree::bulk_load(nodes);

        tracing::debug!(
            categories = merged.len(),
            patterns = patterns.len(),
            indexed,
            "built static catalog provider"
        );

        Self {
            collections: merged,
            patterns,
            neighborhoods,
            category_map,
            place_tree,
        }
    }
}

impl Default for StaticCatalogProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogProvider for StaticCatalogProvider {
    fn categories(&self) -> Vec<PlaceType> {
        self.collections.iter().map(|c| c.category).collect()
    }

    fn places(&self, category: PlaceType) -> &[Arc<Place>] {
        self.category_map
            .get(&category)
            .map(|&index| self.collections[index].places.as_slice())
            .unwrap_or(&[])
    }

    fn all_places(&self) -> Vec<Arc<Place>> {
        self.collections
            .iter()
            .flat_map(|c| c.places.iter().cloned())
            .collect()
    }

    fn patterns(&self) -> &PatternBook {
        &self.patterns
    }

    fn neighborhoods(&self) -> &[NeighborhoodDescriptor] {
        &self.neighborhoods
    }

    fn places_near(&self, point: Point, radius_km: f64) -> Vec<Arc<Place>> {
        // Validate radius is positive
        if radius_km <= 0.0 || !radius_km.is_finite() {
            return Vec::new();
        }

        let degrees = search_radius_degrees(point, radius_km);
        self.place_tree
            .locate_within_distance([point.x(), point.y()], degrees * degrees)
            .filter(|node| haversine_distance_km(point, node.location) <= radius_km)
            .map(|node| node.place.clone())
            .collect()
    }

    fn nearest_places(&self, point: Point, n: usize) -> Vec<Arc<Place>> {
        if n == 0 {
            return Vec::new();
        }

        // Degree-space order does not follow true distance once longitude
        // shrinks with latitude, so every node is ranked by haversine.
        let mut nearest: Vec<(f64, Arc<Place>)> = self
            .place_tree
            .iter()
            .map(|node| (haversine_distance_km(point, node.location), node.place.clone()))
            .collect();

        nearest.sort_by(|a, b| a.0.total_cmp(&b.0));
        nearest.truncate(n);
        nearest.into_iter().map(|(_, place)| place).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::identifiers::PlaceId;
    use crate::models::schedule::OpeningHours;
    use crate::spatial::queries::EARTH_RADIUS_KM;

    fn place(id: u32, place_type: PlaceType, lat: f64, lon: f64) -> Place {
        Place {
            id: PlaceId(id),
            place_type,
            name: format!("place {id}").into(),
            tags: vec![],
            price_range: None,
            should_schedule: false,
            addresses: vec![Address {
                neighborhood: None,
                city: None,
                location: Some(Point::new(lon, lat)),
                is_main_unity: true,
            }],
            opening_hours: OpeningHours::default(),
        }
    }

    fn provider() -> StaticCatalogProvider {
        StaticCatalogProvider::from_data(
            vec![
                CategoryCollection::new(
                    PlaceType::Restaurants,
                    [
                        place(1, PlaceType::Restaurants, -23.5510, -46.6340),
                        place(2, PlaceType::Restaurants, -23.60, -46.70),
                    ],
                ),
                CategoryCollection::new(PlaceType::Bars, [place(1, PlaceType::Bars, 0.0, 0.0)]),
                CategoryCollection::new(
                    PlaceType::Restaurants,
                    [place(3, PlaceType::Restaurants, -23.5600, -46.6400)],
                ),
            ],
            PatternBook::new(),
            vec![],
        )
    }

    #[test]
    fn test_empty_provider() {
        let provider = StaticCatalogProvider::new();
        assert!(provider.categories().is_empty());
        assert!(provider.places(PlaceType::Bars).is_empty());
        assert!(provider.all_places().is_empty());
    }

    #[test]
    fn test_collections_merge_by_category() {
        let provider = provider();
        assert_eq!(
            provider.categories(),
            vec![PlaceType::Restaurants, PlaceType::Bars]
        );
        assert_eq!(provider.places(PlaceType::Restaurants).len(), 3);
        assert!(provider.places(PlaceType::Nature).is_empty());
        assert_eq!(provider.all_places().len(), 4);
    }

    #[test]
    fn test_places_near() {
        let provider = provider();
        let user = Point::new(-46.6333, -23.5505);

        let near: Vec<u32> = provider
            .places_near(user, 3.0)
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(near.len(), 2);
        assert!(near.contains(&1) && near.contains(&3));

        assert!(provider.places_near(user, 0.0).is_empty());
        assert!(provider.places_near(user, f64::NAN).is_empty());
    }

    /// Place `km` due east of `center` along its parallel, by inverting the haversine.
    fn east_of(center: Point, km: f64) -> Point {
        let half_angle = km / EARTH_RADIUS_KM / 2.0;
        let lat = center.y().to_radians();
        let dlon = 2.0 * (half_angle.sin() / lat.cos()).asin();
        Point::new(center.x() + dlon.to_degrees(), center.y())
    }

    fn north_of(center: Point, km: f64) -> Point {
        Point::new(center.x(), center.y() + (km / EARTH_RADIUS_KM).to_degrees())
    }

    fn provider_at(points: &[Point]) -> StaticCatalogProvider {
        let places = points
            .iter()
            .enumerate()
            .map(|(i, p)| place(i as u32 + 1, PlaceType::Nature, p.y(), p.x()));
        StaticCatalogProvider::from_data(
            vec![CategoryCollection::new(PlaceType::Nature, places)],
            PatternBook::new(),
            vec![],
        )
    }

    #[test]
    fn test_places_near_keeps_points_just_inside_radius() {
        for center in [Point::new(10.0, 0.0), Point::new(10.0, 60.0)] {
            let north = north_of(center, 2.999);
            let east = east_of(center, 2.999);
            assert_relative_eq!(haversine_distance_km(center, north), 2.999, epsilon = 1e-6);
            assert_relative_eq!(haversine_distance_km(center, east), 2.999, epsilon = 1e-6);

            let provider = provider_at(&[north, east]);
            assert_eq!(
                provider.places_near(center, 3.0).len(),
                2,
                "center {center:?}"
            );
            assert!(provider.places_near(center, 2.99).is_empty());
        }
    }

    #[test]
    fn test_nearest_places_ranks_by_true_distance_at_high_latitude() {
        let user = Point::new(10.0, 60.0);
        // 0.02 degrees north is ~2.2 km, 0.03 degrees east only ~1.7 km
        let provider = provider_at(&[Point::new(10.0, 60.02), Point::new(10.03, 60.0)]);

        let nearest = provider.nearest_places(user, 1);
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].id, PlaceId(2));

        let both: Vec<u32> = provider.nearest_places(user, 5).iter().map(|p| p.id.0).collect();
        assert_eq!(both, vec![2, 1]);
        assert!(provider.nearest_places(user, 0).is_empty());
    }

    #[test]
    fn test_nearest_places_skips_sentinel_locations() {
        let provider = provider();
        let user = Point::new(-46.6333, -23.5505);

        let nearest = provider.nearest_places(user, 10);
        assert_eq!(nearest.len(), 3);
        assert_eq!(nearest[0].key().id, PlaceId(1));
        assert!(
            nearest.iter().all(|p| p.place_type == PlaceType::Restaurants)
        );
    }
}
