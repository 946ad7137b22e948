//! Spatial indexing and query utilities.

pub mod index;
pub mod queries;

pub use queries::{distance_km, haversine_distance_km, is_locatable};
