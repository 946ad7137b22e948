//! Serialized record shapes and their conversion into the typed model.
//!
//! This is the validation boundary: string-keyed categories, price tiers and
//! day names become enums here, so the engine never sees an unknown variant.
//! One bad record is logged and skipped; it never fails the whole batch.

use std::sync::Arc;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::identifiers::{PatternIdentifier, PlaceId, Tag};
use crate::models::schedule::{ClockTime, DayFlags, DayTag, OpeningHours, OpeningPattern, Period};
use crate::models::types::*;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceRecord {
    pub id: u32,
    #[serde(rename = "type")]
    pub place_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub should_schedule: bool,
    #[serde(default)]
    pub addresses: Vec<AddressRecord>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHoursRecord>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_main_unity: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningHoursRecord {
    #[serde(default)]
    pub pattern_id: Option<String>,
    #[serde(default)]
    pub custom_overrides: Vec<PeriodRecord>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PeriodRecord {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PatternRecord {
    pub id: String,
    #[serde(default)]
    pub periods: Vec<PeriodRecord>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NeighborhoodRecord {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn non_blank(value: Option<String>) -> Option<Arc<str>> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(Into::into)
}

impl TryFrom<PeriodRecord> for Period {
    type Error = CatalogError;

    fn try_from(record: PeriodRecord) -> Result<Self> {
        let mut days = DayFlags::new();
        for day in &record.days {
            match DayTag::parse(day) {
                Ok(tag) => days.set(tag),
                Err(err) => tracing::warn!(%err, "dropping day tag"),
            }
        }
        if days.is_empty() {
            return Err(CatalogError::EmptyPeriodDays);
        }

        let open = non_blank(record.open).map(|t| t.parse::<ClockTime>()).transpose()?;
        let close = non_blank(record.close).map(|t| t.parse::<ClockTime>()).transpose()?;

        Ok(Period { days, open, close })
    }
}

/// Convert periods, skipping the ones that cannot be represented.
pub fn periods_from_records(records: Vec<PeriodRecord>) -> Vec<Period> {
    records
        .into_iter()
        .filter_map(|record| match Period::try_from(record) {
            Ok(period) => Some(period),
            Err(err) => {
                tracing::warn!(%err, "dropping period");
                None
            }
        })
        .collect()
}

impl From<AddressRecord> for Address {
    fn from(record: AddressRecord) -> Self {
        let location = match (record.latitude, record.longitude) {
            (Some(lat), Some(lon)) => Some(Point::new(lon, lat)),
            _ => None,
        };

        Address {
            neighborhood: non_blank(record.neighborhood),
            city: non_blank(record.city),
            location,
            is_main_unity: record.is_main_unity,
        }
    }
}

impl From<OpeningHoursRecord> for OpeningHours {
    fn from(record: OpeningHoursRecord) -> Self {
        OpeningHours {
            pattern_id: non_blank(record.pattern_id).map(PatternIdentifier::new),
            custom_overrides: periods_from_records(record.custom_overrides),
        }
    }
}

impl TryFrom<PlaceRecord> for Place {
    type Error = CatalogError;

    fn try_from(record: PlaceRecord) -> Result<Self> {
        let place_type = PlaceType::parse(&record.place_type)?;

        // An unrecognised tier only loses the price facet for this place
        let price_range = non_blank(record.price_range).and_then(|p| {
            PriceRange::parse(&p)
                .inspect_err(|err| tracing::warn!(id = record.id, %err, "ignoring price range"))
                .ok()
        });

        Ok(Place {
            id: PlaceId(record.id),
            place_type,
            name: record.name.trim().into(),
            tags: record
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(Tag::new)
                .collect(),
            price_range,
            should_schedule: record.should_schedule,
            addresses: record.addresses.into_iter().map(Address::from).collect(),
            opening_hours: record.opening_hours.map(OpeningHours::from).unwrap_or_default(),
        })
    }
}

impl From<PatternRecord> for OpeningPattern {
    fn from(record: PatternRecord) -> Self {
        OpeningPattern {
            id: PatternIdentifier::new(record.id.trim()),
            periods: periods_from_records(record.periods),
        }
    }
}

impl From<NeighborhoodRecord> for NeighborhoodDescriptor {
    fn from(record: NeighborhoodRecord) -> Self {
        NeighborhoodDescriptor {
            name: record.name.trim().into(),
            slug: non_blank(record.slug),
            aliases: record
                .aliases
                .into_iter()
                .filter_map(|a| non_blank(Some(a)))
                .collect(),
        }
    }
}

/// Convert a batch of place records, logging and skipping rejected ones.
pub fn places_from_records(records: impl IntoIterator<Item = PlaceRecord>) -> Vec<Place> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Place::try_from(record) {
                Ok(place) => Some(place),
                Err(err) => {
                    tracing::warn!(id, %err, "skipping place record");
                    None
                }
            }
        })
        .collect()
}

pub fn patterns_from_records(
    records: impl IntoIterator<Item = PatternRecord>,
) -> Vec<OpeningPattern> {
    records.into_iter().map(OpeningPattern::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn place_json(json: &str) -> PlaceRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_record_converts() {
        let record = place_json(r#"{ "id": 4, "type": "tourist-spot", "name": " Parque " }"#);
        let place = Place::try_from(record).unwrap();

        assert_eq!(place.place_type, PlaceType::TouristSpot);
        assert_eq!(&*place.name, "Parque");
        assert!(place.addresses.is_empty());
        assert!(place.opening_hours.is_unknown());
        assert_eq!(place.price_range, None);
    }

    #[test]
    fn test_full_record_converts() {
        let record = place_json(
            r#"{
                "id": 10,
                "type": "RESTAURANTS",
                "name": "Cantina",
                "tags": ["ITALIAN", " ", "wine-bar"],
                "priceRange": "very-expensive",
                "shouldSchedule": true,
                "addresses": [
                    { "neighborhood": "Bela Vista", "city": "São Paulo",
                      "latitude": -23.56, "longitude": -46.64, "isMainUnity": true },
                    { "neighborhood": "", "city": "Santos" }
                ],
                "openingHours": {
                    "patternId": "dinner",
                    "customOverrides": [
                        { "days": ["SUNDAY"], "open": "12:00", "close": "16:00" },
                        { "days": ["NOPE"], "open": "12:00" },
                        { "days": ["MONDAY"], "open": "7pm" }
                    ]
                }
            }"#,
        );
        let place = Place::try_from(record).unwrap();

        assert_eq!(place.tags, vec![Tag::new("ITALIAN"), Tag::new("wine-bar")]);
        assert_eq!(place.price_range, Some(PriceRange::VeryExpensive));
        assert!(place.should_schedule);
        assert_eq!(place.addresses[1].neighborhood, None);
        assert_eq!(place.addresses[1].location, None);
        assert_eq!(
            place.opening_hours.pattern_id,
            Some(PatternIdentifier::new("dinner"))
        );
        // Unknown-only days and malformed times are dropped
        assert_eq!(place.opening_hours.custom_overrides.len(), 1);
        assert!(
            place.opening_hours.custom_overrides[0].applies_on(Weekday::Sun)
        );
        assert!(place.location().is_some());
    }

    #[test]
    fn test_unknown_price_is_missing_not_fatal() {
        let record = place_json(r#"{ "id": 1, "type": "BARS", "priceRange": "CHEAP" }"#);
        assert_eq!(Place::try_from(record).unwrap().price_range, None);
    }

    #[test]
    fn test_batch_skips_unknown_types() {
        let records: Vec<PlaceRecord> = serde_json::from_str(
            r#"[
                { "id": 1, "type": "BARS" },
                { "id": 2, "type": "CASINOS" },
                { "id": 3, "type": "nightlife" }
            ]"#,
        )
        .unwrap();

        let places = places_from_records(records);
        let ids: Vec<u32> = places.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_pattern_record_converts() {
        let record: PatternRecord = serde_json::from_str(
            r#"{ "id": "late", "periods": [
                { "days": ["FRIDAY", "SATURDAY"], "open": "22:00", "close": "05:00" },
                { "days": ["SUNDAY"] }
            ] }"#,
        )
        .unwrap();
        let pattern = OpeningPattern::from(record);

        assert_eq!(pattern.periods.len(), 2);
        assert!(pattern.periods[0].is_overnight());
        assert_eq!(pattern.periods[1].window(), None);
    }

    #[test]
    fn test_neighborhood_record_converts() {
        let record: NeighborhoodRecord = serde_json::from_str(
            r#"{ "name": "Vila Madalena", "aliases": ["vila-madalena", "", "vl-madalena"] }"#,
        )
        .unwrap();
        let descriptor = NeighborhoodDescriptor::from(record);

        assert_eq!(descriptor.slug, None);
        assert_eq!(descriptor.aliases.len(), 2);
    }
}
