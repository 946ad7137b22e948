//! Single-pass, AND-composed facet filter.

use std::sync::Arc;

use chrono::NaiveDateTime;
use geo::Point;
use strum::{Display, EnumIter, EnumString};

use crate::availability::AvailabilityEvaluator;
use crate::catalog::{Place, PriceRange};
use crate::facet::normalize::facet_key;
use crate::proximity::distance_to;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScheduleRequirement {
    #[default]
    Any,
    Required,
    NotRequired,
}

/// Keep only places whose main address lies within `radius_km` of `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusFacet {
    pub center: Point,
    pub radius_km: f64,
}

/// User-chosen filter criteria. Every field is optional; unset never excludes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetCriteria {
    /// Primary type or any tag, compared with [`facet_key`].
    pub kind: Option<String>,
    pub schedule: ScheduleRequirement,
    /// Matches any address, ignoring case.
    pub city: Option<String>,
    pub price_tier: Option<PriceRange>,
    pub open_now: bool,
    pub within: Option<RadiusFacet>,
}

impl FacetCriteria {
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleRequirement) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_price_tier(mut self, tier: PriceRange) -> Self {
        self.price_tier = Some(tier);
        self
    }

    pub fn with_open_now(mut self, open_now: bool) -> Self {
        self.open_now = open_now;
        self
    }

    pub fn with_radius(mut self, center: Point, radius_km: f64) -> Self {
        self.within = Some(RadiusFacet { center, radius_km });
        self
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn matches_kind(place: &Place, kind: &str) -> bool {
    let wanted = facet_key(kind);
    facet_key(&place.place_type.to_string()) == wanted
        || place.tags.iter().any(|tag| facet_key(tag.as_str()) == wanted)
}

fn matches_city(place: &Place, city: &str) -> bool {
    let wanted = city.to_lowercase();
    place
        .addresses
        .iter()
        .filter_map(|a| a.city.as_deref())
        .any(|c| c.trim().to_lowercase() == wanted)
}

fn matches_schedule(place: &Place, schedule: ScheduleRequirement) -> bool {
    match schedule {
        ScheduleRequirement::Any => true,
        ScheduleRequirement::Required => place.should_schedule,
        ScheduleRequirement::NotRequired => !place.should_schedule,
    }
}

fn matches_radius(place: &Place, radius: &RadiusFacet) -> bool {
    distance_to(radius.center, place).is_some_and(|d| d <= radius.radius_km)
}

/// Evaluates [`FacetCriteria`] against places at a fixed instant.
pub struct FacetFilter<'a> {
    evaluator: &'a AvailabilityEvaluator<'a>,
    now: NaiveDateTime,
}

impl<'a> FacetFilter<'a> {
    pub fn new(evaluator: &'a AvailabilityEvaluator<'a>, now: NaiveDateTime) -> Self {
        Self { evaluator, now }
    }

    pub fn matches(&self, place: &Place, criteria: &FacetCriteria) -> bool {
        non_blank(&criteria.kind).is_none_or(|kind| matches_kind(place, kind))
            && matches_schedule(place, criteria.schedule)
            && non_blank(&criteria.city).is_none_or(|city| matches_city(place, city))
            && criteria.price_tier.is_none_or(|tier| place.price_range == Some(tier))
            && criteria.within.as_ref().is_none_or(|radius| matches_radius(place, radius))
            && (!criteria.open_now || self.evaluator.is_open(place, self.now))
    }

    /// New collection of the places matching every criterion, in input order.
    pub fn filter_places(
        &self,
        places: &[Arc<Place>],
        criteria: &FacetCriteria,
    ) -> Vec<Arc<Place>> {
        let filtered: Vec<Arc<Place>> = places
            .iter()
            .filter(|place| self.matches(place, criteria))
            .cloned()
            .collect();

        tracing::debug!(input = places.len(), output = filtered.len(), "filtered places");
        filtered
    }
}

/// One-shot form of [`FacetFilter::filter_places`].
pub fn filter_places(
    places: &[Arc<Place>],
    criteria: &FacetCriteria,
    evaluator: &AvailabilityEvaluator<'_>,
    now: NaiveDateTime,
) -> Vec<Arc<Place>> {
    FacetFilter::new(evaluator, now).filter_places(places, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::availability::AvailabilityConfig;
    use crate::catalog::{
        Address, DayFlags, OpeningHours, OpeningPattern, PatternBook, Period, PlaceId, PlaceType,
        Tag,
    };

    struct Fixture {
        patterns: PatternBook,
        places: Vec<Arc<Place>>,
    }

    fn place(
        id: u32,
        place_type: PlaceType,
        tags: &[&str],
        city: Option<&str>,
        price: Option<PriceRange>,
        should_schedule: bool,
        pattern: Option<&str>,
    ) -> Arc<Place> {
        Arc::new(Place {
            id: PlaceId(id),
            place_type,
            name: format!("place {id}").into(),
            tags: tags.iter().map(|t| Tag::new(t)).collect(),
            price_range: price,
            should_schedule,
            addresses: vec![Address {
                neighborhood: None,
                city: city.map(Into::into),
                location: Some(Point::new(-46.6340, -23.5510)),
                is_main_unity: true,
            }],
            opening_hours: pattern.map(OpeningHours::from_pattern).unwrap_or_default(),
        })
    }

    fn fixture() -> Fixture {
        let everyday = |open: &str, close: &str| {
            Period::new(
                DayFlags::everyday(),
                open.parse().unwrap(),
                close.parse().unwrap(),
            )
        };
        let patterns = PatternBook::from_patterns([
            OpeningPattern {
                id: "day".into(),
                periods: vec![everyday("09:00", "18:00")],
            },
            OpeningPattern {
                id: "night".into(),
                periods: vec![everyday("22:00", "05:00")],
            },
        ]);

        let places = vec![
            place(
                1,
                PlaceType::Restaurants,
                &["ITALIAN"],
                Some("São Paulo"),
                Some(PriceRange::Moderate),
                true,
                Some("day"),
            ),
            place(
                2,
                PlaceType::Bars,
                &["rooftop"],
                Some("são paulo"),
                Some(PriceRange::Expensive),
                false,
                Some("night"),
            ),
            place(
                3,
                PlaceType::Nightlife,
                &["BARS"],
                Some("Santos"),
                None,
                false,
                None,
            ),
            place(
                4,
                PlaceType::TouristSpot,
                &[],
                None,
                Some(PriceRange::Free),
                false,
                Some("day"),
            ),
        ];

        Fixture { patterns, places }
    }

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2024-01-03 {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn run(fixture: &Fixture, criteria: &FacetCriteria, time: &str) -> Vec<u32> {
        let evaluator =
            AvailabilityEvaluator::new(&fixture.patterns, AvailabilityConfig::default());
        filter_places(&fixture.places, criteria, &evaluator, at(time))
            .iter()
            .map(|p| p.id.0)
            .collect()
    }

    #[test]
    fn empty_criteria_keep_everything() {
        let fixture = fixture();
        assert_eq!(
            run(&fixture, &FacetCriteria::default(), "12:00"),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn kind_matches_type_or_tag() {
        let fixture = fixture();
        let criteria = FacetCriteria::default().with_kind("bars");
        assert_eq!(run(&fixture, &criteria, "12:00"), vec![2, 3]);

        let criteria = FacetCriteria::default().with_kind("tourist-spot");
        assert_eq!(run(&fixture, &criteria, "12:00"), vec![4]);

        let criteria = FacetCriteria::default().with_kind("  ");
        assert_eq!(run(&fixture, &criteria, "12:00").len(), 4);
    }

    #[test]
    fn city_is_case_insensitive_and_missing_city_fails() {
        let fixture = fixture();
        let criteria = FacetCriteria::default().with_city("SÃO PAULO");
        assert_eq!(run(&fixture, &criteria, "12:00"), vec![1, 2]);
    }

    #[test]
    fn city_matches_a_secondary_address() {
        let branch = |city: &str, main: bool| Address {
            neighborhood: None,
            city: Some(city.into()),
            location: None,
            is_main_unity: main,
        };
        let mut two_units = (*place(5, PlaceType::Coffees, &[], None, None, false, None)).clone();
        two_units.addresses = vec![branch("Campinas", true), branch("Santos", false)];

        let mut fixture = fixture();
        fixture.places.push(Arc::new(two_units));

        let criteria = FacetCriteria::default().with_city("santos");
        assert_eq!(run(&fixture, &criteria, "12:00"), vec![3, 5]);
    }

    #[test]
    fn radius_boundary_is_inclusive() {
        let fixture = fixture();
        let center = Point::new(-46.6333, -23.5505);
        let exact = distance_to(center, &fixture.places[0]).unwrap();

        let on_edge = FacetCriteria::default().with_radius(center, exact);
        assert_eq!(run(&fixture, &on_edge, "12:00").len(), 4);

        let inside_edge = FacetCriteria::default().with_radius(center, exact * 0.999);
        assert!(run(&fixture, &inside_edge, "12:00").is_empty());
    }

    #[test]
    fn schedule_and_price() {
        let fixture = fixture();
        let required = FacetCriteria::default().with_schedule(ScheduleRequirement::Required);
        assert_eq!(run(&fixture, &required, "12:00"), vec![1]);

        let not_required =
            FacetCriteria::default().with_schedule(ScheduleRequirement::NotRequired);
        assert_eq!(run(&fixture, &not_required, "12:00"), vec![2, 3, 4]);

        let free = FacetCriteria::default().with_price_tier(PriceRange::Free);
        assert_eq!(run(&fixture, &free, "12:00"), vec![4]);
    }

    #[test]
    fn open_now_uses_availability() {
        let fixture = fixture();
        let criteria = FacetCriteria::default().with_open_now(true);

        assert_eq!(run(&fixture, &criteria, "12:00"), vec![1, 4]);
        assert_eq!(run(&fixture, &criteria, "23:00"), vec![2]);
        assert_eq!(run(&fixture, &criteria, "06:00"), Vec::<u32>::new());
    }

    #[test]
    fn radius_facet() {
        let fixture = fixture();
        let near = FacetCriteria::default().with_radius(Point::new(-46.6333, -23.5505), 1.0);
        assert_eq!(run(&fixture, &near, "12:00").len(), 4);

        let far = FacetCriteria::default().with_radius(Point::new(-43.1729, -22.9068), 1.0);
        assert!(run(&fixture, &far, "12:00").is_empty());
    }

    #[test]
    fn adding_criteria_never_grows_the_result() {
        let fixture = fixture();
        let steps = [
            FacetCriteria::default(),
            FacetCriteria::default().with_city("são paulo"),
            FacetCriteria::default().with_city("são paulo").with_kind("bars"),
            FacetCriteria::default()
                .with_city("são paulo")
                .with_kind("bars")
                .with_open_now(true),
            FacetCriteria::default()
                .with_city("são paulo")
                .with_kind("bars")
                .with_open_now(true)
                .with_price_tier(PriceRange::Free),
        ];

        let sizes: Vec<usize> = steps.iter().map(|c| run(&fixture, c, "23:00").len()).collect();
        assert!(sizes.windows(2).all(|w| w[1] <= w[0]), "{sizes:?}");
    }

    #[test]
    fn empty_input() {
        let patterns = PatternBook::new();
        let evaluator = AvailabilityEvaluator::with_defaults(&patterns);
        assert!(
            filter_places(&[], &FacetCriteria::default(), &evaluator, at("12:00")).is_empty()
        );
    }

    #[test]
    fn schedule_parse() {
        assert_eq!(
            "not-required".parse::<ScheduleRequirement>().unwrap(),
            ScheduleRequirement::NotRequired
        );
        assert_eq!(ScheduleRequirement::default(), ScheduleRequirement::Any);
    }
}
