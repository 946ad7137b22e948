//! Proximity ranking for the "near me" view.
//!
//! Distances are straight-line (Haversine) kilometers between the user and each
//! place's main address.

use std::cmp::Ordering;
use std::sync::Arc;

use geo::Point;

use crate::catalog::spatial::{haversine_distance_km, is_locatable};
use crate::catalog::{CategoryCollection, Place, PlaceType};

pub use crate::catalog::spatial::distance_km as distance;

#[derive(Clone, Debug)]
pub struct PlaceDistance {
    pub place: Arc<Place>,
    pub distance_km: f64,
}

/// Per-category summary relative to the user.
#[derive(Clone, Debug)]
pub struct CategoryProximity {
    pub category: PlaceType,
    /// Places within the radius.
    pub count: usize,
    /// Closest locatable place, whether or not it is within the radius.
    pub nearest: Option<PlaceDistance>,
    /// Places within the radius, closest first.
    pub members: Vec<PlaceDistance>,
}

impl CategoryProximity {
    pub fn nearest_km(&self) -> Option<f64> {
        self.nearest.as_ref().map(|n| n.distance_km)
    }
}

fn by_distance(a: &PlaceDistance, b: &PlaceDistance) -> Ordering {
    a.distance_km.total_cmp(&b.distance_km)
}

/// Distance from `user` to the place's main address, if both are real locations.
pub fn distance_to(user: Point, place: &Place) -> Option<f64> {
    if !is_locatable(user) {
        return None;
    }
    place.location().map(|location| haversine_distance_km(user, location))
}

fn summarize(user: Point, collection: &CategoryCollection, radius_km: f64) -> CategoryProximity {
    let located: Vec<PlaceDistance> = collection
        .places
        .iter()
        .filter_map(|place| {
            distance_to(user, place).map(|distance_km| PlaceDistance {
                place: place.clone(),
                distance_km,
            })
        })
        .collect();

    let nearest = located.iter().min_by(|a, b| by_distance(a, b)).cloned();

    let mut members: Vec<PlaceDistance> = located
        .into_iter()
        .filter(|p| p.distance_km <= radius_km)
        .collect();
    members.sort_by(by_distance);

    CategoryProximity {
        category: collection.category,
        count: members.len(),
        nearest,
        members,
    }
}

/// Summaries for every category, ordered by nearest distance.
///
/// Categories without any locatable place come last, in input order.
pub fn rank_by_proximity(
    user: Point,
    categories: &[CategoryCollection],
    radius_km: f64,
) -> Vec<CategoryProximity> {
    if !is_locatable(user) {
        tracing::debug!(
            lat = user.y(),
            lon = user.x(),
            "user location is not usable"
        );
    }

    let mut ranked: Vec<CategoryProximity> = categories
        .iter()
        .map(|collection| summarize(user, collection, radius_km))
        .collect();

    ranked.sort_by(|a, b| match (a.nearest_km(), b.nearest_km()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked
}
