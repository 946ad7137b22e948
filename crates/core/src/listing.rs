//! The listing pipeline both listing views share: neighborhood, facets, order.

use std::sync::Arc;

use crate::aggregator::{AliasTable, filter_by_neighborhood_slug};
use crate::catalog::Place;
use crate::facet::{FacetCriteria, FacetFilter, SortKey, sort_places};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListingQuery {
    /// Neighborhood slug; aliases resolve through the [`AliasTable`].
    pub neighborhood: Option<String>,
    pub criteria: FacetCriteria,
    pub sort: SortKey,
}

pub fn run_listing(
    places: &[Arc<Place>],
    query: &ListingQuery,
    aliases: &AliasTable,
    filter: &FacetFilter<'_>,
) -> Vec<Arc<Place>> {
    let scoped;
    let places = match query.neighborhood.as_deref() {
        Some(slug) => {
            scoped = filter_by_neighborhood_slug(places, slug, aliases);
            scoped.as_slice()
        }
        None => places,
    };

    let filtered = filter.filter_places(places, &query.criteria);
    sort_places(&filtered, query.sort)
}
