use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::availability::status::OpeningStatus;
use crate::catalog::{ClockTime, DayTag, OpeningPattern, PatternBook, Period, Place};

pub const DEFAULT_OPENS_SOON_MINUTES: i64 = 60;
pub const DEFAULT_LOOK_AHEAD_DAYS: u8 = 7;

#[derive(Clone, Debug)]
pub struct AvailabilityConfig {
    /// Openings later today within this delta are reported as `OpensSoon`.
    pub opens_soon_within: TimeDelta,
    /// How many days past today the next-opening search looks.
    pub look_ahead_days: u8,
    /// Dates on which `HOLIDAY` periods take over.
    pub holidays: Arc<HashSet<NaiveDate>>,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            opens_soon_within: TimeDelta::minutes(DEFAULT_OPENS_SOON_MINUTES),
            look_ahead_days: DEFAULT_LOOK_AHEAD_DAYS,
            holidays: Arc::new(HashSet::new()),
        }
    }
}

/// Whether any of the given periods covers `now`.
///
/// The periods must already be the ones that apply today. `open < close` is a
/// same-day window, anything else wraps past midnight (`open == close` is 24h).
/// A period without a close time is never open.
pub fn is_open_now<'a>(periods: impl IntoIterator<Item = &'a Period>, now: NaiveTime) -> bool {
    let minutes = ClockTime::of(now).minutes();
    periods
        .into_iter()
        .filter_map(Period::window)
        .any(|(open, close)| {
            let (open, close) = (open.minutes(), close.minutes());
            if open < close {
                open <= minutes && minutes < close
            } else {
                minutes >= open || minutes < close
            }
        })
}

/// Periods of `periods` that apply on `date`.
///
/// On a holiday, `HOLIDAY` periods replace the weekday ones when there are any.
fn periods_for_day(periods: &[Period], date: NaiveDate, holiday: bool) -> Vec<Period> {
    if holiday {
        let holiday_periods: Vec<Period> = periods
            .iter()
            .filter(|p| p.days.contains(DayTag::Holiday))
            .copied()
            .collect();
        if !holiday_periods.is_empty() {
            return holiday_periods;
        }
    }

    periods
        .iter()
        .filter(|p| p.applies_on(date.weekday()))
        .copied()
        .collect()
}

fn earliest_open(periods: &[Period], after: Option<u16>) -> Option<ClockTime> {
    periods
        .iter()
        .filter_map(|p| p.open)
        .filter(|open| after.is_none_or(|m| open.minutes() > m))
        .min()
}

/// Answers "open now?" and "when does it open next?" for places.
///
/// Never fails: unknown pattern ids degrade to unknown hours.
#[derive(Clone, Debug)]
pub struct AvailabilityEvaluator<'a> {
    patterns: &'a PatternBook,
    config: AvailabilityConfig,
}

impl<'a> AvailabilityEvaluator<'a> {
    pub fn new(patterns: &'a PatternBook, config: AvailabilityConfig) -> Self {
        Self { patterns, config }
    }

    pub fn with_defaults(patterns: &'a PatternBook) -> Self {
        Self::new(patterns, AvailabilityConfig::default())
    }

    pub fn config(&self) -> &AvailabilityConfig {
        &self.config
    }

    fn pattern_for(&self, place: &Place) -> Option<&'a OpeningPattern> {
        let id = place.opening_hours.pattern_id.as_ref()?;
        let pattern = self.patterns.get(id);
        if pattern.is_none() {
            tracing::debug!(place = %place.key(), pattern = %id, "unknown opening pattern");
        }
        pattern
    }

    /// False when the place has no usable pattern and no overrides.
    pub fn has_known_hours(&self, place: &Place) -> bool {
        !place.opening_hours.custom_overrides.is_empty() || self.pattern_for(place).is_some()
    }

    /// The periods in force on `date`.
    ///
    /// Overrides that apply on that date replace the pattern for the whole day.
    pub fn resolve_periods(&self, place: &Place, date: NaiveDate) -> Vec<Period> {
        let holiday = self.config.holidays.contains(&date);

        let overrides = periods_for_day(&place.opening_hours.custom_overrides, date, holiday);
        if !overrides.is_empty() {
            return overrides;
        }

        self.pattern_for(place)
            .map(|pattern| periods_for_day(&pattern.periods, date, holiday))
            .unwrap_or_default()
    }

    /// Open at `now`, counting overnight windows that started the day before.
    pub fn is_open(&self, place: &Place, now: NaiveDateTime) -> bool {
        if !self.has_known_hours(place) {
            return false;
        }

        let today = self.resolve_periods(place, now.date());
        if is_open_now(&today, now.time()) {
            return true;
        }

        let Some(yesterday) = now.date().pred_opt() else {
            return false;
        };
        let minutes = ClockTime::of(now.time()).minutes();
        self.resolve_periods(place, yesterday)
            .iter()
            .filter(|p| p.is_overnight())
            .filter_map(Period::window)
            .any(|(_, close)| minutes < close.minutes())
    }

    /// `Unavailable`, `OpenNow` or `ClosedNow`.
    pub fn current_status(&self, place: &Place, now: NaiveDateTime) -> OpeningStatus {
        if !self.has_known_hours(place) {
            OpeningStatus::Unavailable
        } else if self.is_open(place, now) {
            OpeningStatus::OpenNow
        } else {
            OpeningStatus::ClosedNow
        }
    }

    /// Next-opening status, reporting openings within the threshold as `OpensSoon`.
    pub fn next_opening(&self, place: &Place, now: NaiveDateTime) -> OpeningStatus {
        self.next_opening_status(place, now, true)
    }

    /// Like [`Self::next_opening`], but always reports the literal time.
    pub fn next_opening_exact(&self, place: &Place, now: NaiveDateTime) -> OpeningStatus {
        self.next_opening_status(place, now, false)
    }

    /// The instant of the next opening, if one exists within the look-ahead window.
    ///
    /// `None` both for unknown hours and for places that are open right now.
    pub fn next_opening_at(&self, place: &Place, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.has_known_hours(place) || self.is_open(place, now) {
            return None;
        }
        let (offset, open) = self.find_next_opening(place, now)?;
        let date = now.date() + TimeDelta::days(i64::from(offset));
        let midnight = date.and_time(NaiveTime::MIN);
        Some(midnight + TimeDelta::minutes(i64::from(open.minutes())))
    }

    fn next_opening_status(
        &self,
        place: &Place,
        now: NaiveDateTime,
        round: bool,
    ) -> OpeningStatus {
        if !self.has_known_hours(place) {
            return OpeningStatus::Unavailable;
        }
        if self.is_open(place, now) {
            return OpeningStatus::OpenNow;
        }

        match self.find_next_opening(place, now) {
            Some((0, open)) => {
                let now_minutes = ClockTime::of(now.time()).minutes();
                let wait = i64::from(open.minutes()) - i64::from(now_minutes);
                if round && wait <= self.config.opens_soon_within.num_minutes() {
                    OpeningStatus::OpensSoon
                } else {
                    OpeningStatus::OpensAt(open)
                }
            }
            Some((1, open)) => OpeningStatus::OpensTomorrowAt(open),
            Some((offset, open)) => {
                let date = now.date() + TimeDelta::days(i64::from(offset));
                OpeningStatus::OpensOnAt(date.weekday(), open)
            }
            None => OpeningStatus::NoUpcomingOpening,
        }
    }

    /// Day offset and time of the next opening: later today first, then the
    /// earliest opening of each following day.
    fn find_next_opening(&self, place: &Place, now: NaiveDateTime) -> Option<(u8, ClockTime)> {
        let minutes = ClockTime::of(now.time()).minutes();
        let today = self.resolve_periods(place, now.date());
        if let Some(open) = earliest_open(&today, Some(minutes)) {
            return Some((0, open));
        }

        (1..=self.config.look_ahead_days).find_map(|offset| {
            let date = now.date().checked_add_days(chrono::Days::new(u64::from(offset)))?;
            earliest_open(&self.resolve_periods(place, date), None).map(|open| (offset, open))
        })
    }
}
