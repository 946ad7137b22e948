//! Weekly opening patterns.
//!
//! A pattern is a list of periods, each bound to a set of day tags and an
//! optional open/close clock time. Close earlier than (or equal to) open means
//! the window runs past midnight.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveTime, Timelike, Weekday};
use strum::{Display, EnumIter, EnumString};

use crate::identifiers::PatternIdentifier;
use crate::models::types::{canonical_token, CatalogError, Result};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time as minutes since midnight. `24:00` is allowed as an end of day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        match (hour, minute) {
            (24, 0) => Some(Self(MINUTES_PER_DAY)),
            (h, m) if h < 24 && m < 60 => Some(Self(h * 60 + m)),
            _ => None,
        }
    }

    pub fn of(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl FromStr for ClockTime {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CatalogError::InvalidClockTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Day vocabulary used by periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum DayTag {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Everyday = 7,
    Holiday = 8,
    /// "Call to check" marker; never resolves to a concrete weekday.
    CheckAvailabilityDaytime = 9,
}

impl DayTag {
    pub fn parse(value: &str) -> Result<Self> {
        Self::from_str(&canonical_token(value))
            .map_err(|_| CatalogError::UnknownDayTag(value.to_string()))
    }

    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => Self::Sunday,
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u8)
    }
}

/// Compact representation of the day tags a period is attached to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayFlags {
    pub(crate) flags: u16,
}

impl DayFlags {
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    pub fn everyday() -> Self {
        Self::from_tags([DayTag::Everyday])
    }

    pub fn from_tags(tags: impl IntoIterator<Item = DayTag>) -> Self {
        let mut flags = Self::new();
        for tag in tags {
            flags.set(tag);
        }
        flags
    }

    pub fn set(&mut self, tag: DayTag) {
        self.flags |= tag.bit();
    }

    pub fn unset(&mut self, tag: DayTag) {
        self.flags &= !tag.bit();
    }

    pub fn contains(&self, tag: DayTag) -> bool {
        (self.flags & tag.bit()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.flags == 0
    }

    /// Explicit weekday or EVERYDAY.
    pub fn applies_on(&self, weekday: Weekday) -> bool {
        self.contains(DayTag::from_weekday(weekday)) || self.contains(DayTag::Everyday)
    }
}

/// One recurring window. No open/close means the listed days are closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub days: DayFlags,
    pub open: Option<ClockTime>,
    pub close: Option<ClockTime>,
}

impl Period {
    pub fn new(days: DayFlags, open: ClockTime, close: ClockTime) -> Self {
        Self {
            days,
            open: Some(open),
            close: Some(close),
        }
    }

    pub fn closed(days: DayFlags) -> Self {
        Self {
            days,
            open: None,
            close: None,
        }
    }

    pub fn window(&self) -> Option<(ClockTime, ClockTime)> {
        self.open.zip(self.close)
    }

    /// Close at or before open: the window crosses midnight (equal means 24h).
    pub fn is_overnight(&self) -> bool {
        matches!(self.window(), Some((open, close)) if close <= open)
    }

    pub fn applies_on(&self, weekday: Weekday) -> bool {
        self.days.applies_on(weekday)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpeningPattern {
    pub id: PatternIdentifier,
    pub periods: Vec<Period>,
}

/// What a place says about its hours.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpeningHours {
    pub pattern_id: Option<PatternIdentifier>,
    pub custom_overrides: Vec<Period>,
}

impl OpeningHours {
    pub fn from_pattern(id: impl Into<PatternIdentifier>) -> Self {
        Self {
            pattern_id: Some(id.into()),
            custom_overrides: Vec::new(),
        }
    }

    /// Neither a pattern nor overrides: availability cannot be stated.
    pub fn is_unknown(&self) -> bool {
        self.pattern_id.is_none() && self.custom_overrides.is_empty()
    }
}

/// Lookup of reusable patterns by id.
#[derive(Clone, Debug, Default)]
pub struct PatternBook {
    patterns: HashMap<PatternIdentifier, Arc<OpeningPattern>>,
}

impl PatternBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later duplicates of an id are ignored.
    pub fn from_patterns(patterns: impl IntoIterator<Item = OpeningPattern>) -> Self {
        let mut book = Self::new();
        for pattern in patterns {
            book.patterns
                .entry(pattern.id.clone())
                .or_insert_with(|| Arc::new(pattern));
        }
        book
    }

    pub fn get(&self, id: &PatternIdentifier) -> Option<&OpeningPattern> {
        self.patterns.get(id).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
