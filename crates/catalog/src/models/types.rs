//! Core data types and enums for catalog data.

use std::str::FromStr;
use std::sync::Arc;

use geo::Point;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::identifiers::*;
use crate::models::schedule::OpeningHours;
use crate::spatial::queries::is_locatable;

// ============================================================================
// Enums
// ============================================================================

/// Canonical category of a place. Every place has exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceType {
    Restaurants,
    Bars,
    Nature,
    TouristSpot,
    #[strum(to_string = "FORFUN", serialize = "FOR_FUN")]
    ForFun,
    Stores,
    Nightlife,
    Coffees,
}

impl PlaceType {
    /// Parse a category identifier, ignoring case and treating `-` like `_`.
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(&canonical_token(value))
            .map_err(|_| CatalogError::UnknownPlaceType(value.to_string()))
    }
}

/// Price tier, ordered from cheapest to most expensive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRange {
    Free,
    Economic,
    Moderate,
    Expensive,
    #[strum(to_string = "VERY-EXPENSIVE", serialize = "VERY_EXPENSIVE")]
    VeryExpensive,
}

impl PriceRange {
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(&canonical_token(value))
            .map_err(|_| CatalogError::UnknownPriceRange(value.to_string()))
    }
}

/// Upper-cases and maps `-` to `_` so `tourist-spot` and `TOURIST_SPOT` agree.
pub(crate) fn canonical_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

// ============================================================================
// Data Structures
// ============================================================================

/// One physical unit of a place.
#[derive(Clone, Debug, PartialEq)]
pub struct Address {
    pub neighborhood: Option<Arc<str>>,
    pub city: Option<Arc<str>>,
    /// (x = longitude, y = latitude), as everywhere in `geo`.
    pub location: Option<Point>,
    pub is_main_unity: bool,
}

impl Address {
    /// The address location when it is a real coordinate (not missing, in range, not 0,0).
    pub fn locatable_point(&self) -> Option<Point> {
        self.location.filter(|p| is_locatable(*p))
    }
}

/// A recommendable catalog entry.
#[derive(Clone, Debug)]
pub struct Place {
    pub id: PlaceId,
    pub place_type: PlaceType,
    pub name: Arc<str>,
    pub tags: Vec<Tag>,
    pub price_range: Option<PriceRange>,
    /// Reservation required.
    pub should_schedule: bool,
    pub addresses: Vec<Address>,
    pub opening_hours: OpeningHours,
}

impl Place {
    pub fn key(&self) -> PlaceKey {
        PlaceKey {
            place_type: self.place_type,
            id: self.id,
        }
    }

    /// The address flagged as main unity, falling back to the first one.
    pub fn main_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_main_unity)
            .or_else(|| self.addresses.first())
    }

    pub fn location(&self) -> Option<Point> {
        self.main_address().and_then(Address::locatable_point)
    }

    pub fn neighborhood(&self) -> Option<&str> {
        self.main_address().and_then(|a| a.neighborhood.as_deref())
    }
}

/// A neighborhood known to the catalog, with alternative slugs it may be reached by.
///
/// Without an explicit slug, consumers derive one from the name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborhoodDescriptor {
    pub name: Arc<str>,
    pub slug: Option<Arc<str>>,
    pub aliases: Vec<Arc<str>>,
}

/// All places of one category, as handed over by the data layer.
#[derive(Clone, Debug)]
pub struct CategoryCollection {
    pub category: PlaceType,
    pub places: Vec<Arc<Place>>,
}

impl CategoryCollection {
    pub fn new(category: PlaceType, places: impl IntoIterator<Item = Place>) -> Self {
        Self {
            category,
            places: places.into_iter().map(Arc::new).collect(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown place type: {0}")]
    UnknownPlaceType(String),

    #[error("Unknown price range: {0}")]
    UnknownPriceRange(String),

    #[error("Unknown day tag: {0}")]
    UnknownDayTag(String),

    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("Period has no days")]
    EmptyPeriodDays,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
