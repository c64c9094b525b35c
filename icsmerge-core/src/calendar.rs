//! Ownership container for the events of one snapshot.

use crate::event::{EventIdentity, EventRecord};
use chrono::NaiveDate;
use std::collections::HashSet;

/// A parsed calendar: zero or more events plus notes about components the
/// loader had to skip. Non-VEVENT components are dropped at parse time.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    pub events: Vec<EventRecord>,
    /// Human-readable reasons for events the loader skipped (e.g. a VEVENT
    /// missing DTSTART). Surfaced to the caller as warnings, never fatal.
    pub skipped: Vec<String>,
}

impl Calendar {
    /// An empty calendar, used when no previous snapshot was supplied.
    pub fn empty() -> Self {
        Calendar::default()
    }

    /// Extract the identity set used for reconciliation. Duplicate identity
    /// tuples in the source collapse to one member (set semantics).
    pub fn identities(&self) -> HashSet<EventIdentity> {
        self.events.iter().map(|e| e.identity()).collect()
    }

    /// Date of the earliest event start, if any.
    pub fn earliest(&self) -> Option<NaiveDate> {
        self.events.iter().map(|e| e.start.date()).min()
    }

    /// Date of the latest event start, if any.
    pub fn latest(&self) -> Option<NaiveDate> {
        self.events.iter().map(|e| e.start.date()).max()
    }
}
