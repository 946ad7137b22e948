//! # city-guide-catalog
//!
//! Read-only catalog of city places and their weekly opening patterns.
//!
//! ## Features
//!
//! - **Typed model**: categories, price tiers and day tags are closed enums
//! - **Opening patterns**: reusable weekly periods, overnight windows included
//! - **Spatial queries**: R-tree pre-filter plus Haversine distance
//! - **Record layer** (`serde` feature): validates raw documents at the boundary
//!
//! ## Example
//!
//! ```
//! use city_guide_catalog::prelude::*;
//! use geo::Point;
//!
//! let place = Place {
//!     id: PlaceId(1),
//!     place_type: PlaceType::Restaurants,
//!     name: "Cantina".into(),
//!     tags: vec![Tag::new("ITALIAN")],
//!     price_range: Some(PriceRange::Moderate),
//!     should_schedule: false,
//!     addresses: vec![Address {
//!         neighborhood: Some("Bela Vista".into()),
//!         city: Some("São Paulo".into()),
//!         location: Some(Point::new(-46.6340, -23.5510)),
//!         is_main_unity: true,
//!     }],
//!     opening_hours: OpeningHours::from_pattern("dinner"),
//! };
//!
//! let provider = StaticCatalogProvider::from_data(
//!     vec![CategoryCollection::new(PlaceType::Restaurants, [place])],
//!     PatternBook::new(),
//!     vec![],
//! );
//!
//! // Query places
//! let user = Point::new(-46.6333, -23.5505);
//! let nearby = provider.places_near(user, 3.0); // 3km radius
//! assert_eq!(nearby.len(), 1);
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;
pub mod spatial;

#[cfg(feature = "serde")]
pub mod records;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{schedule::*, traits::*, types::*};
    pub use crate::provider::static_provider::StaticCatalogProvider;
}

pub use prelude::*;
