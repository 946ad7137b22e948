//! JSON views written to stdout.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;

use city_guide_catalog::Place;
use city_guide_core::aggregator::{FacetOption, FacetSource};
use city_guide_core::availability::OpeningStatus;
use city_guide_core::proximity::{CategoryProximity, PlaceDistance};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_opening_at: Option<String>,
}

impl StatusView {
    pub fn new(status: OpeningStatus, next_opening_at: Option<NaiveDateTime>) -> Self {
        Self {
            code: status.code(),
            weekday: status.weekday().map(|d| d.to_string()),
            time: status.time().map(|t| t.to_string()),
            next_opening_at: next_opening_at.map(|at| at.format("%Y-%m-%dT%H:%M").to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceView {
    pub id: u32,
    #[serde(rename = "type")]
    pub place_type: String,
    pub name: String,
    pub tags: Vec<String>,
    pub neighborhood: Option<String>,
    pub price_range: Option<String>,
    pub should_schedule: bool,
    pub status: StatusView,
}

impl PlaceView {
    pub fn new(place: &Place, status: StatusView) -> Self {
        Self {
            id: place.id.0,
            place_type: place.place_type.to_string(),
            name: place.name.to_string(),
            tags: place.tags.iter().map(ToString::to_string).collect(),
            neighborhood: place.neighborhood().map(str::to_string),
            price_range: place.price_range.map(|p| p.to_string()),
            should_schedule: place.should_schedule,
            status,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceView {
    pub id: u32,
    pub name: String,
    pub distance_km: f64,
}

impl From<&PlaceDistance> for DistanceView {
    fn from(entry: &PlaceDistance) -> Self {
        Self {
            id: entry.place.id.0,
            name: entry.place.name.to_string(),
            distance_km: entry.distance_km,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityView {
    pub category: String,
    pub count: usize,
    pub nearest: Option<DistanceView>,
    pub members: Vec<DistanceView>,
}

impl From<&CategoryProximity> for ProximityView {
    fn from(summary: &CategoryProximity) -> Self {
        Self {
            category: summary.category.to_string(),
            count: summary.count,
            nearest: summary.nearest.as_ref().map(DistanceView::from),
            members: summary.members.iter().map(DistanceView::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct FacetView {
    pub source: &'static str,
    pub value: String,
}

impl From<&FacetOption> for FacetView {
    fn from(option: &FacetOption) -> Self {
        Self {
            source: match option.source {
                FacetSource::Tag => "tag",
                FacetSource::Type => "type",
            },
            value: option.value.to_string(),
        }
    }
}

pub fn write_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("Failed to write output")?;
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
