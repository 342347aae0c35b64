//! Per-day availability for a single listing
//!
//! The backend sends a sparse list of [`DayRecord`] overrides. An
//! [`AvailabilityTable`] turns them into a total lookup over the booking
//! window `[today, today + horizon_days)`: dates inside the window default to
//! available, dates before `today` are always [`DayStatus::Past`], and dates
//! at or beyond the horizon are [`DayStatus::OutOfWindow`].

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Default booking window length in days
pub const DEFAULT_HORIZON_DAYS: u32 = 365;

/// Longest booking window accepted from configuration
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Status a backend record can assign to a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Available,
    Booked,
    Blocked,
}

impl RecordStatus {
    /// Parse a backend status string, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "booked" => Some(Self::Booked),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

/// Resolved status of a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Booked,
    /// Blocked by the host
    Blocked,
    /// Before the reference date
    Past,
    /// Beyond the booking horizon
    OutOfWindow,
}

impl DayStatus {
    pub fn is_selectable(self) -> bool {
        matches!(self, DayStatus::Available)
    }
}

impl From<RecordStatus> for DayStatus {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::Available => DayStatus::Available,
            RecordStatus::Booked => DayStatus::Booked,
            RecordStatus::Blocked => DayStatus::Blocked,
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayStatus::Available => write!(f, "available"),
            DayStatus::Booked => write!(f, "booked"),
            DayStatus::Blocked => write!(f, "blocked"),
            DayStatus::Past => write!(f, "past"),
            DayStatus::OutOfWindow => write!(f, "out of window"),
        }
    }
}

/// One day's explicit status as sent by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: RecordStatus,
}

impl DayRecord {
    pub fn new(date: NaiveDate, status: RecordStatus) -> Self {
        Self { date, status }
    }
}

/// Status lookup for one listing's booking window
///
/// Rebuilt wholesale whenever the listing is reloaded; never patched.
#[derive(Debug, Clone)]
pub struct AvailabilityTable {
    today: NaiveDate,
    horizon_days: u32,
    window_end: NaiveDate,
    overrides: HashMap<NaiveDate, RecordStatus>,
}

impl AvailabilityTable {
    /// Build a table from backend overrides
    ///
    /// Duplicate dates are resolved last-write-wins. Overrides outside the
    /// window are kept out of the table since they can never be selected.
    /// A horizon running past the last representable date ends the window
    /// at [`NaiveDate::MAX`].
    pub fn build(today: NaiveDate, horizon_days: u32, overrides: &[DayRecord]) -> Self {
        let end = today
            .checked_add_signed(Duration::days(i64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut table = HashMap::with_capacity(overrides.len());
        let mut duplicates = 0usize;
        let mut outside = 0usize;

        for record in overrides {
            if record.date < today || record.date >= end {
                outside += 1;
                continue;
            }
            if table.insert(record.date, record.status).is_some() {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            warn!(
                "Availability contained {} duplicate date(s); keeping the last record for each",
                duplicates
            );
        }
        debug!(
            %today,
            horizon_days,
            overrides = table.len(),
            outside_window = outside,
            "Built availability table"
        );

        Self {
            today,
            horizon_days,
            window_end: end,
            overrides: table,
        }
    }

    /// Build with the default 365-day horizon
    pub fn with_default_horizon(today: NaiveDate, overrides: &[DayRecord]) -> Self {
        Self::build(today, DEFAULT_HORIZON_DAYS, overrides)
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// First date past the booking window
    pub fn window_end(&self) -> NaiveDate {
        self.window_end
    }

    pub fn status_of(&self, date: NaiveDate) -> DayStatus {
        if date < self.today {
            return DayStatus::Past;
        }
        if date >= self.window_end() {
            return DayStatus::OutOfWindow;
        }
        self.overrides
            .get(&date)
            .copied()
            .map(DayStatus::from)
            .unwrap_or(DayStatus::Available)
    }

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        self.status_of(date).is_selectable()
    }

    /// First non-selectable date strictly between `start` and `end`
    pub fn first_blocked_between(&self, start: NaiveDate, end: NaiveDate) -> Option<NaiveDate> {
        start
            .iter_days()
            .skip(1)
            .take_while(|d| *d < end)
            .find(|d| !self.is_selectable(*d))
    }

    /// Every date in the window with its status, in calendar order
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, DayStatus)> + '_ {
        let end = self.window_end();
        self.today
            .iter_days()
            .take_while(move |d| *d < end)
            .map(move |d| (d, self.status_of(d)))
    }
}
