//! Snapshot-neutral event types.
//!
//! `EventIdentity` is the (summary, start, end) tuple used as the sole
//! equality/hash key when comparing snapshots. Two events with the same
//! identity are the same logical event even when their UIDs differ, so
//! snapshots exported by different tools stay comparable. `EventRecord` is
//! the extended form carried for display and serialization only; the
//! reconciliation engine never keys on it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DTSTART/DTEND value, preserving the granularity the source file used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day (VALUE=DATE)
    Date(NaiveDate),
    /// UTC datetime (Z suffix)
    DateTimeUtc(DateTime<Utc>),
    /// Floating datetime (no Z, no TZID)
    DateTimeFloating(NaiveDateTime),
    /// Datetime with a TZID parameter
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// Truncate to date-only granularity (discards time-of-day).
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(d) => *d,
            EventTime::DateTimeUtc(dt) => dt.date_naive(),
            EventTime::DateTimeFloating(dt) => dt.date(),
            EventTime::DateTimeZoned { datetime, .. } => datetime.date(),
        }
    }

    /// Key used when ordering events for display. Dates sort as midnight;
    /// zoned/floating times sort by their wall-clock value.
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(NaiveTime::MIN),
            EventTime::DateTimeUtc(dt) => dt.naive_utc(),
            EventTime::DateTimeFloating(dt) => *dt,
            EventTime::DateTimeZoned { datetime, .. } => *datetime,
        }
    }

}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTimeUtc(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
            EventTime::DateTimeFloating(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
            EventTime::DateTimeZoned { datetime, tzid } => {
                write!(f, "{} {}", datetime.format("%Y-%m-%d %H:%M"), tzid)
            }
        }
    }
}

/// The atomic unit of snapshot comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventIdentity {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl EventIdentity {
    /// Coerce both ends to date-only granularity (all-day conversion).
    pub fn to_all_day(&self) -> EventIdentity {
        EventIdentity {
            summary: self.summary.clone(),
            start: EventTime::Date(self.start.date()),
            end: EventTime::Date(self.end.date()),
        }
    }
}

impl fmt::Display for EventIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.summary, self.start.date().format("%Y-%m-%d"))
    }
}

/// A full event as read from (or written to) a calendar file.
///
/// The extra fields are display/serialization payload; identity comparison
/// goes through [`EventRecord::identity`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    /// DTSTAMP (creation timestamp)
    pub stamp: Option<DateTime<Utc>>,
    /// UID, if the source carried one
    pub uid: Option<String>,
    pub description: Option<String>,
}

impl EventRecord {
    pub fn identity(&self) -> EventIdentity {
        EventIdentity {
            summary: self.summary.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

/// Sort identities for display: ascending by start, then summary so output
/// is deterministic when two events share a start.
pub fn sort_for_display(identities: &mut [EventIdentity]) {
    identities.sort_by(|a, b| {
        a.start
            .sort_key()
            .cmp(&b.start.sort_key())
            .then_with(|| a.summary.cmp(&b.summary))
    });
}
