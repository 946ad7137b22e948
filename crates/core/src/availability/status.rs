use std::fmt;

use chrono::Weekday;

use crate::catalog::ClockTime;

/// Where a place stands relative to its hours.
///
/// Canonical data only; presentation turns it into localized text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpeningStatus {
    /// No pattern and no overrides: hours are not known.
    Unavailable,
    OpenNow,
    ClosedNow,
    /// Opens later today, within the configured threshold.
    OpensSoon,
    OpensAt(ClockTime),
    OpensTomorrowAt(ClockTime),
    OpensOnAt(Weekday, ClockTime),
    /// Known hours, but nothing opens within the look-ahead window.
    NoUpcomingOpening,
}

impl OpeningStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::OpenNow)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    /// Stable machine-readable code of the variant.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::OpenNow => "openNow",
            Self::ClosedNow => "closedNow",
            Self::OpensSoon => "opensSoon",
            Self::OpensAt(_) => "opensAt",
            Self::OpensTomorrowAt(_) => "opensTomorrowAt",
            Self::OpensOnAt(..) => "opensOnAt",
            Self::NoUpcomingOpening => "noUpcomingOpening",
        }
    }

    pub fn time(&self) -> Option<ClockTime> {
        match self {
            Self::OpensAt(t) | Self::OpensTomorrowAt(t) | Self::OpensOnAt(_, t) => Some(*t),
            _ => None,
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            Self::OpensOnAt(day, _) => Some(*day),
            _ => None,
        }
    }
}

impl fmt::Display for OpeningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpensAt(t) | Self::OpensTomorrowAt(t) => write!(f, "{}({})", self.code(), t),
            Self::OpensOnAt(day, t) => write!(f, "{}({},{})", self.code(), day, t),
            _ => f.write_str(self.code()),
        }
    }
}
