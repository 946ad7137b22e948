//! Reading catalog documents from disk.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use city_guide_catalog::records::{
    patterns_from_records, places_from_records, NeighborhoodRecord, PatternRecord, PlaceRecord,
};
use city_guide_catalog::{CategoryCollection, NeighborhoodDescriptor, OpeningPattern, PlaceType};

/// A places document is either a flat list or an object keyed by category.
///
/// Category keys keep document order (`serde_json/preserve_order`), since the
/// first occurrence of a duplicated place wins when catalogs are merged.
#[derive(Deserialize)]
#[serde(untagged)]
enum PlacesDocument {
    List(Vec<PlaceRecord>),
    ByCategory(Map<String, Value>),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Group places into collections. Flat lists are grouped by each place's own type.
pub fn parse_places(text: &str) -> Result<Vec<CategoryCollection>> {
    let document: PlacesDocument = serde_json::from_str(text).context("Invalid places document")?;

    let collections = match document {
        PlacesDocument::List(records) => {
            let mut collections: Vec<CategoryCollection> = Vec::new();
            for place in places_from_records(records) {
                match collections.iter_mut().find(|c| c.category == place.place_type) {
                    Some(collection) => collection.places.push(place.into()),
                    None => collections.push(CategoryCollection::new(place.place_type, [place])),
                }
            }
            collections
        }
        PlacesDocument::ByCategory(categories) => {
            let mut collections = Vec::with_capacity(categories.len());
            for (key, value) in categories {
                let category = match PlaceType::parse(&key) {
                    Ok(category) => category,
                    Err(err) => {
                        tracing::warn!(%err, "skipping unrecognised category");
                        continue;
                    }
                };
                let records: Vec<PlaceRecord> = serde_json::from_value(value)
                    .with_context(|| format!("Invalid places under {key}"))?;
                let places = places_from_records(records);
                collections.push(CategoryCollection::new(category, places));
            }
            collections
        }
    };

    Ok(collections)
}

pub fn read_places(path: &Path) -> Result<Vec<CategoryCollection>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_places(&text).with_context(|| format!("Failed to load places from {}", path.display()))
}

pub fn read_patterns(path: &Path) -> Result<Vec<OpeningPattern>> {
    let records: Vec<PatternRecord> = read_json(path)?;
    Ok(patterns_from_records(records))
}

pub fn read_neighborhoods(path: &Path) -> Result<Vec<NeighborhoodDescriptor>> {
    let records: Vec<NeighborhoodRecord> = read_json(path)?;
    Ok(records.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_list_is_grouped_by_type() {
        let collections = parse_places(
            r#"[
                { "id": 1, "type": "BARS", "name": "A" },
                { "id": 1, "type": "RESTAURANTS", "name": "B" },
                { "id": 2, "type": "bars", "name": "C" },
                { "id": 3, "type": "SPACESHIPS", "name": "D" }
            ]"#,
        )
        .unwrap();

        let shape: Vec<(PlaceType, usize)> =
            collections.iter().map(|c| (c.category, c.places.len())).collect();
        assert_eq!(
            shape,
            vec![(PlaceType::Bars, 2), (PlaceType::Restaurants, 1)]
        );
    }

    #[test]
    fn keyed_document_skips_unknown_categories() {
        let collections = parse_places(
            r#"{
                "NIGHTLIFE": [ { "id": 1, "type": "NIGHTLIFE" }, { "id": 2, "type": "BARS" } ],
                "CASINOS": [ { "id": 1, "type": "BARS" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].category, PlaceType::Nightlife);
        assert_eq!(collections[0].places.len(), 2);
    }

    #[test]
    fn keyed_document_keeps_category_order() {
        let collections = parse_places(
            r#"{
                "STORES": [ { "id": 1, "type": "STORES" } ],
                "BARS": [ { "id": 1, "type": "BARS" } ],
                "COFFEES": [ { "id": 1, "type": "COFFEES" } ]
            }"#,
        )
        .unwrap();

        let order: Vec<PlaceType> = collections.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![PlaceType::Stores, PlaceType::Bars, PlaceType::Coffees]
        );
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_places(r#"{ "BARS": 3 }"#).is_err());
        assert!(parse_places("not json").is_err());
    }
}
