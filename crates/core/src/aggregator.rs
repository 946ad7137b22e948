//! Merging category collections and discovering facet options.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use itertools::Itertools;

use crate::catalog::{CategoryCollection, NeighborhoodDescriptor, Place};
use crate::facet::normalize::{collation_key, facet_key, slugify};

/// Concatenate collections, keeping the first place seen for each (type, id).
pub fn merge_catalogs<'a>(
    collections: impl IntoIterator<Item = &'a CategoryCollection>,
) -> Vec<Arc<Place>> {
    collections
        .into_iter()
        .flat_map(|collection| collection.places.iter())
        .unique_by(|place| place.key())
        .cloned()
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FacetSource {
    Tag,
    Type,
}

/// One filter chip: a canonical value plus where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacetOption {
    pub source: FacetSource,
    pub value: Arc<str>,
}

/// Distinct facet values present in `places`, ordered by label.
///
/// Tags win; primary types are used only when no place carries a tag.
pub fn discover_facet_values(places: &[Arc<Place>]) -> Vec<FacetOption> {
    let has_tags = places.iter().any(|place| !place.tags.is_empty());

    let options: Vec<FacetOption> = if has_tags {
        places
            .iter()
            .flat_map(|place| place.tags.iter())
            .unique_by(|tag| facet_key(tag.as_str()))
            .map(|tag| FacetOption {
                source: FacetSource::Tag,
                value: tag.as_str().into(),
            })
            .collect()
    } else {
        places
            .iter()
            .map(|place| place.place_type)
            .unique()
            .map(|place_type| FacetOption {
                source: FacetSource::Type,
                value: place_type.to_string().into(),
            })
            .collect()
    };

    options
        .into_iter()
        .sorted_by_cached_key(|option| collation_key(&option.value))
        .collect()
}

/// Neighborhood slug equivalences built from the descriptor list.
#[derive(Clone, Debug, Default)]
pub struct AliasTable {
    // canonical slug -> alias slugs
    aliases: HashMap<String, Vec<String>>,
    // alias slug -> canonical slug
    canonical: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: &[NeighborhoodDescriptor]) -> Self {
        let mut table = Self::new();
        for descriptor in descriptors {
            let slug = descriptor
                .slug
                .as_deref()
                .map(slugify)
                .unwrap_or_else(|| slugify(&descriptor.name));
            table.insert(&slug, descriptor.aliases.iter().map(|a| a.as_ref()));
        }
        table
    }

    pub fn insert<'s>(&mut self, slug: &str, aliases: impl IntoIterator<Item = &'s str>) {
        let slug = slugify(slug);
        if slug.is_empty() {
            return;
        }

        let entry = self.aliases.entry(slug.clone()).or_default();
        for alias in aliases.into_iter().map(slugify) {
            if alias.is_empty() || alias == slug || entry.contains(&alias) {
                continue;
            }
            self.canonical.entry(alias.clone()).or_insert_with(|| slug.clone());
            entry.push(alias);
        }
    }

    /// Every slug that names the same neighborhood as `slug`, itself included.
    pub fn equivalents(&self, slug: &str) -> HashSet<String> {
        let slug = slugify(slug);
        if slug.is_empty() {
            return HashSet::new();
        }

        let canonical = self.canonical.get(&slug).cloned().unwrap_or_else(|| slug.clone());
        let mut equivalents = HashSet::from([slug, canonical.clone()]);
        if let Some(aliases) = self.aliases.get(&canonical) {
            equivalents.extend(aliases.iter().cloned());
        }
        equivalents
    }
}

/// Places with any address in the neighborhood named by `slug` or one of its aliases.
///
/// A place with several units in that neighborhood appears once.
pub fn filter_by_neighborhood_slug(
    places: &[Arc<Place>],
    slug: &str,
    aliases: &AliasTable,
) -> Vec<Arc<Place>> {
    let wanted = aliases.equivalents(slug);
    if wanted.is_empty() {
        return Vec::new();
    }

    places
        .iter()
        .filter(|place| {
            place
                .addresses
                .iter()
                .filter_map(|address| address.neighborhood.as_deref())
                .any(|neighborhood| wanted.contains(&slugify(neighborhood)))
        })
        .unique_by(|place| place.key())
        .cloned()
        .collect()
}
