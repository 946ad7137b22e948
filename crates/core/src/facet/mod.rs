//! Facet filtering and ordering of place collections.

pub mod filter;
pub mod normalize;
pub mod sort;

pub use filter::{FacetCriteria, FacetFilter, RadiusFacet, ScheduleRequirement, filter_places};
pub use normalize::{collation_key, facet_key, slugify};
pub use sort::{SortKey, sort_places};
