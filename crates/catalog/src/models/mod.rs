//! Catalog data models, types, and traits.

pub mod schedule;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use schedule::{ClockTime, DayFlags, DayTag, OpeningHours, OpeningPattern, PatternBook, Period};
pub use traits::CatalogProvider;
pub use types::{
    Address, CatalogError, CategoryCollection, NeighborhoodDescriptor, Place, PlaceType, PriceRange,
    Result,
};
