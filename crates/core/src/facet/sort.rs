use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};

use crate::catalog::Place;
use crate::facet::normalize::collation_key;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NameAsc,
    /// Main address neighborhood; places without one sort first.
    NeighborhoodAsc,
}

impl SortKey {
    fn text<'p>(&self, place: &'p Place) -> &'p str {
        match self {
            Self::NameAsc => place.name.as_ref(),
            Self::NeighborhoodAsc => place.neighborhood().unwrap_or(""),
        }
    }
}

/// Stable, accent- and case-insensitive ordering. Never mutates the input.
pub fn sort_places(places: &[Arc<Place>], key: SortKey) -> Vec<Arc<Place>> {
    let mut sorted = places.to_vec();
    sorted.sort_by_cached_key(|place| collation_key(key.text(place)));
    sorted
}
