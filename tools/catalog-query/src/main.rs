use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use clap::Parser;
use geo::Point;
use tracing_subscriber::EnvFilter;

mod load;
mod output;

use city_guide_catalog::{CatalogProvider, PatternBook, PriceRange, StaticCatalogProvider};
use city_guide_core::prelude::*;
use load::{read_neighborhoods, read_patterns, read_places};
use output::{write_json, FacetView, PlaceView, ProximityView, StatusView};

#[derive(Parser, Debug)]
#[command(
    name = "catalog-query",
    author,
    version,
    about = "Filter, sort and rank a city place catalog",
    long_about = "Loads place, opening-pattern and neighborhood documents, then prints the \
                  filtered and ordered listing as JSON, each place with its opening status.\n\n\
                  With --rank the per-category proximity summary around --near is printed \
                  instead; with --facets the filter options present in the catalog."
)]
struct Args {
    /// Places JSON file (a list, or an object keyed by category). Repeatable.
    #[arg(short, long, required = true)]
    places: Vec<PathBuf>,

    /// Opening patterns JSON file
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Neighborhood descriptors JSON file (slugs and aliases)
    #[arg(long)]
    neighborhoods: Option<PathBuf>,

    /// Type or tag facet (e.g. "tourist-spot", "rooftop")
    #[arg(short, long)]
    kind: Option<String>,

    /// City facet, case-insensitive
    #[arg(long)]
    city: Option<String>,

    /// Price tier facet (FREE, ECONOMIC, MODERATE, EXPENSIVE, VERY-EXPENSIVE)
    #[arg(long, value_parser = parse_price)]
    price: Option<PriceRange>,

    /// Reservation facet: any, required or not-required
    #[arg(long, default_value = "any", value_parser = parse_schedule)]
    schedule: ScheduleRequirement,

    /// Only places open at the reference instant
    #[arg(long)]
    open_now: bool,

    /// Neighborhood slug (aliases resolve through --neighborhoods)
    #[arg(long)]
    neighborhood: Option<String>,

    /// Ordering: name-asc or neighborhood-asc
    #[arg(long, default_value = "name-asc", value_parser = parse_sort)]
    sort: SortKey,

    /// Reference instant as "YYYY-MM-DD HH:MM" (defaults to local now)
    #[arg(long, value_parser = parse_instant)]
    at: Option<NaiveDateTime>,

    /// User location as "LAT,LON"; adds a radius facet to the listing
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    near: Option<Point>,

    /// Radius in kilometers used with --near
    #[arg(long, default_value = "3.0")]
    radius_km: f64,

    /// Print the proximity ranking per category instead of the listing
    #[arg(long)]
    rank: bool,

    /// Print the facet options present in the catalog instead of the listing
    #[arg(long)]
    facets: bool,

    /// Openings within this many minutes are reported as "opensSoon"
    #[arg(long, default_value = "60")]
    opens_soon_minutes: i64,

    /// Report literal opening times, never "opensSoon"
    #[arg(long)]
    exact_times: bool,

    /// Holiday date (YYYY-MM-DD) on which HOLIDAY periods apply. Repeatable.
    #[arg(long, value_parser = parse_date)]
    holiday: Vec<NaiveDate>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_price(value: &str) -> std::result::Result<PriceRange, String> {
    PriceRange::parse(value).map_err(|e| e.to_string())
}

fn parse_schedule(value: &str) -> std::result::Result<ScheduleRequirement, String> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| format!("unknown schedule requirement: {value}"))
}

fn parse_sort(value: &str) -> std::result::Result<SortKey, String> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| format!("unknown sort key: {value}"))
}

fn parse_instant(value: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M").map_err(|e| e.to_string())
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| e.to_string())
}

fn parse_lat_lon(value: &str) -> std::result::Result<Point, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value}"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude: {lat}"))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude: {lon}"))?;
    Ok(Point::new(lon, lat))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.rank && args.near.is_none() {
        bail!("--rank needs a user location (--near LAT,LON)");
    }

    // Load documents
    let mut collections = Vec::new();
    for path in &args.places {
        tracing::info!("Places: {}", path.display());
        collections.extend(read_places(path)?);
    }

    let patterns = match &args.patterns {
        Some(path) => {
            tracing::info!("Patterns: {}", path.display());
            PatternBook::from_patterns(read_patterns(path)?)
        }
        None => PatternBook::new(),
    };

    let neighborhoods = match &args.neighborhoods {
        Some(path) => read_neighborhoods(path).context("Failed to load neighborhoods")?,
        None => Vec::new(),
    };

    let provider = StaticCatalogProvider::from_data(collections, patterns, neighborhoods);
    tracing::info!(
        categories = provider.categories().len(),
        patterns = provider.patterns().len(),
        "catalog loaded"
    );

    let config = AvailabilityConfig {
        opens_soon_within: TimeDelta::minutes(args.opens_soon_minutes),
        holidays: Arc::new(args.holiday.iter().copied().collect::<HashSet<_>>()),
        ..AvailabilityConfig::default()
    };
    let evaluator = AvailabilityEvaluator::new(provider.patterns(), config);
    let now = args.at.unwrap_or_else(|| chrono::Local::now().naive_local());

    let collections: Vec<_> = provider
        .categories()
        .into_iter()
        .map(|category| city_guide_catalog::CategoryCollection {
            category,
            places: provider.places(category).to_vec(),
        })
        .collect();

    if let (true, Some(user)) = (args.rank, args.near) {
        let ranked = rank_by_proximity(user, &collections, args.radius_km);
        let views: Vec<ProximityView> = ranked.iter().map(ProximityView::from).collect();
        return write_json(&views);
    }

    let places = merge_catalogs(&collections);

    if args.facets {
        let views: Vec<FacetView> = discover_facet_values(&places)
            .iter()
            .map(FacetView::from)
            .collect();
        return write_json(&views);
    }

    let mut criteria = FacetCriteria {
        kind: args.kind.clone(),
        schedule: args.schedule,
        city: args.city.clone(),
        price_tier: args.price,
        open_now: args.open_now,
        within: None,
    };
    if let Some(user) = args.near {
        criteria = criteria.with_radius(user, args.radius_km);
    }

    let query = ListingQuery {
        neighborhood: args.neighborhood.clone(),
        criteria,
        sort: args.sort,
    };
    let aliases = AliasTable::from_descriptors(provider.neighborhoods());
    let filter = FacetFilter::new(&evaluator, now);
    let listing = run_listing(&places, &query, &aliases, &filter);
    tracing::info!(total = places.len(), shown = listing.len(), at = %now, "listing ready");

    let views: Vec<PlaceView> = listing
        .iter()
        .map(|place| {
            let status = if args.exact_times {
                evaluator.next_opening_exact(place, now)
            } else {
                evaluator.next_opening(place, now)
            };
            let next_at = evaluator.next_opening_at(place, now);
            PlaceView::new(place, StatusView::new(status, next_at))
        })
        .collect();

    write_json(&views)
}
