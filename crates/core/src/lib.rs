//! # city-guide-core
//!
//! Filtering, ordering and availability engine over a read-only place catalog.
//!
//! Data flows leaf-first: [`aggregator`] merges category collections, [`facet`]
//! narrows them (asking [`availability`] and [`proximity`] where needed), and
//! [`facet::sort_places`] orders the result for presentation.

pub mod aggregator;
pub mod availability;
pub mod facet;
pub mod listing;
pub mod proximity;

// Re-export the catalog from the catalog crate
pub use city_guide_catalog as catalog;

pub mod prelude {
    pub use crate::aggregator::{
        AliasTable, FacetOption, FacetSource, discover_facet_values, filter_by_neighborhood_slug,
        merge_catalogs,
    };
    pub use crate::availability::{
        AvailabilityConfig, AvailabilityEvaluator, OpeningStatus, is_open_now,
    };
    pub use crate::facet::{
        FacetCriteria, FacetFilter, RadiusFacet, ScheduleRequirement, SortKey, filter_places,
        sort_places,
    };
    pub use crate::listing::{ListingQuery, run_listing};
    pub use crate::proximity::{CategoryProximity, PlaceDistance, distance, rank_by_proximity};
}
