//! R-tree nodes for spatial indexing.
//!
//! The tree works in plain degree space, which is only good for a coarse
//! pre-filter. Queries then apply the Haversine distance to the candidates.

use std::sync::Arc;

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

use crate::models::types::Place;

#[derive(Clone)]
pub struct PlaceNode {
    pub place: Arc<Place>,
    pub location: Point,
    point: [f64; 2],
}

impl PlaceNode {
    pub fn new(location: Point, place: Arc<Place>) -> Self {
        Self {
            place,
            location,
            point: [location.x(), location.y()],
        }
    }

    /// Node for the place's main address, if it has a real location.
    pub fn for_place(place: &Arc<Place>) -> Option<Self> {
        place
            .location()
            .map(|location| Self::new(location, place.clone()))
    }
}

impl RTreeObject for PlaceNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PlaceNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
