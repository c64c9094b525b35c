//! Reconciliation between two snapshot event sets.
//!
//! Computes what's new in the latest snapshot and what may be stale from the
//! previous one, without touching either input file. Exclusions are applied
//! to both sides before the set difference: an excluded event present in
//! both snapshots must not surface as unique to one of them.

use crate::calendar::Calendar;
use crate::error::MergeResult;
use crate::event::{EventIdentity, EventRecord, sort_for_display};
use crate::exclusions::ExclusionList;
use chrono::Utc;
use std::collections::HashSet;
use uuid::Uuid;

/// Result of reconciling the previous snapshot against the new one.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Events present in the new snapshot but not the previous, after
    /// exclusion. Sorted ascending by start for display.
    pub newly_added: Vec<EventIdentity>,
    /// Events present in the previous snapshot but not the new, after
    /// exclusion. Removal suggestions only, never auto-removed.
    pub possibly_stale: Vec<EventIdentity>,
    /// Events the exclusion list removed from the previous snapshot.
    pub excluded_previous: Vec<EventIdentity>,
    /// Events the exclusion list removed from the new snapshot.
    pub excluded_new: Vec<EventIdentity>,
    /// True when no previous snapshot was supplied at all (first run).
    /// Distinct from a previous snapshot that was supplied but empty.
    pub first_run: bool,
    /// Output calendar holding one event per member of `newly_added`.
    pub output: Calendar,
}

/// Reconcile two identity sets.
///
/// `previous == None` signals a first run: `possibly_stale` is trivially
/// empty and `first_run` is set, even if the new snapshot has events.
/// With `all_day` set, output events are coerced to date-only granularity.
pub fn reconcile(
    previous: Option<&HashSet<EventIdentity>>,
    new: &HashSet<EventIdentity>,
    exclusions: &ExclusionList,
    all_day: bool,
) -> MergeResult<Reconciliation> {
    let first_run = previous.is_none();

    // Filter both sides, not just the new one: otherwise an excluded event
    // present in both snapshots shows up as unique to one side.
    let (kept_previous, excluded_previous) = match previous {
        Some(events) => exclusions.partition(events),
        None => (HashSet::new(), HashSet::new()),
    };
    let (kept_new, excluded_new) = exclusions.partition(new);

    let mut newly_added: Vec<EventIdentity> =
        kept_new.difference(&kept_previous).cloned().collect();
    let mut possibly_stale: Vec<EventIdentity> = if first_run {
        Vec::new()
    } else {
        kept_previous.difference(&kept_new).cloned().collect()
    };
    let mut excluded_previous: Vec<EventIdentity> = excluded_previous.into_iter().collect();
    let mut excluded_new: Vec<EventIdentity> = excluded_new.into_iter().collect();
    sort_for_display(&mut newly_added);
    sort_for_display(&mut possibly_stale);
    sort_for_display(&mut excluded_previous);
    sort_for_display(&mut excluded_new);

    let output = build_output(&newly_added, all_day);

    Ok(Reconciliation {
        newly_added,
        possibly_stale,
        excluded_previous,
        excluded_new,
        first_run,
        output,
    })
}

/// Build the output calendar: one freshly stamped event per new identity.
fn build_output(newly_added: &[EventIdentity], all_day: bool) -> Calendar {
    let stamp = Utc::now();
    let events = newly_added
        .iter()
        .map(|identity| {
            let identity = if all_day {
                identity.to_all_day()
            } else {
                identity.clone()
            };
            EventRecord {
                summary: identity.summary,
                start: identity.start,
                end: identity.end,
                stamp: Some(stamp),
                uid: Some(format!("icsmerge-{}", Uuid::new_v4())),
                description: None,
            }
        })
        .collect();

    Calendar {
        events,
        skipped: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn standup() -> EventIdentity {
        EventIdentity {
            summary: "Standup".to_string(),
            start: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            end: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap()),
        }
    }

    fn review() -> EventIdentity {
        EventIdentity {
            summary: "Review".to_string(),
            start: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 8, 14, 0, 0).unwrap()),
            end: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap()),
        }
    }

    fn set(events: &[EventIdentity]) -> HashSet<EventIdentity> {
        events.iter().cloned().collect()
    }

    #[test]
    fn test_new_event_is_detected() {
        let previous = set(&[standup()]);
        let new = set(&[standup(), review()]);

        let result =
            reconcile(Some(&previous), &new, &ExclusionList::empty(), false).unwrap();

        assert_eq!(result.newly_added, vec![review()]);
        assert!(result.possibly_stale.is_empty());
        assert!(!result.first_run);
        assert_eq!(result.output.events.len(), 1);
        assert_eq!(result.output.events[0].summary, "Review");
    }

    #[test]
    fn test_exclusion_suppresses_new_event_case_insensitively() {
        let previous = set(&[standup()]);
        let new = set(&[standup(), review()]);
        let exclusions = ExclusionList::parse("review", false);

        let result = reconcile(Some(&previous), &new, &exclusions, false).unwrap();

        assert!(result.newly_added.is_empty());
        assert_eq!(result.excluded_new, vec![review()]);
        assert!(result.output.events.is_empty());
    }

    #[test]
    fn test_both_sides_are_filtered() {
        // An excluded event present only in the previous snapshot must land
        // in excluded_previous, not in possibly_stale.
        let previous = set(&[standup(), review()]);
        let new = set(&[standup()]);
        let exclusions = ExclusionList::parse("review", false);

        let result = reconcile(Some(&previous), &new, &exclusions, false).unwrap();

        assert!(result.possibly_stale.is_empty());
        assert_eq!(result.excluded_previous, vec![review()]);
    }

    #[test]
    fn test_swapping_snapshots_swaps_the_two_sets() {
        let a = set(&[standup()]);
        let b = set(&[standup(), review()]);
        let exclusions = ExclusionList::empty();

        let forward = reconcile(Some(&a), &b, &exclusions, false).unwrap();
        let backward = reconcile(Some(&b), &a, &exclusions, false).unwrap();

        assert_eq!(forward.newly_added, backward.possibly_stale);
        assert_eq!(forward.possibly_stale, backward.newly_added);
    }

    #[test]
    fn test_first_run_reports_no_stale_events() {
        let new = set(&[standup(), review()]);

        let result = reconcile(None, &new, &ExclusionList::empty(), false).unwrap();

        assert!(result.first_run);
        assert!(result.possibly_stale.is_empty());
        assert_eq!(result.newly_added.len(), 2, "all new events on first run");
    }

    #[test]
    fn test_empty_previous_snapshot_is_not_first_run() {
        let previous = HashSet::new();
        let new = set(&[standup()]);

        let result =
            reconcile(Some(&previous), &new, &ExclusionList::empty(), false).unwrap();

        assert!(!result.first_run, "supplied-but-empty differs from absent");
        assert_eq!(result.newly_added, vec![standup()]);
    }

    #[test]
    fn test_empty_new_snapshot_is_not_an_error() {
        let previous = set(&[standup()]);
        let new = HashSet::new();

        let result =
            reconcile(Some(&previous), &new, &ExclusionList::empty(), false).unwrap();

        assert!(result.newly_added.is_empty());
        assert_eq!(result.possibly_stale, vec![standup()]);
        assert!(result.output.events.is_empty());
    }

    #[test]
    fn test_all_day_conversion_truncates_output_times() {
        let previous = HashSet::new();
        let new = set(&[review()]);

        let result =
            reconcile(Some(&previous), &new, &ExclusionList::empty(), true).unwrap();

        let event = &result.output.events[0];
        assert_eq!(
            event.start,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
        );
        assert_eq!(
            event.end,
            EventTime::Date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap())
        );
        // newly_added keeps the source granularity; only the output is coerced
        assert_eq!(result.newly_added, vec![review()]);
    }

    #[test]
    fn test_reconcile_is_idempotent_modulo_stamp_and_uid() {
        let previous = set(&[standup()]);
        let new = set(&[standup(), review()]);
        let exclusions = ExclusionList::parse("sync", false);

        let first = reconcile(Some(&previous), &new, &exclusions, false).unwrap();
        let second = reconcile(Some(&previous), &new, &exclusions, false).unwrap();

        assert_eq!(first.newly_added, second.newly_added);
        assert_eq!(first.possibly_stale, second.possibly_stale);
        assert_eq!(
            first.output.identities(),
            second.output.identities(),
            "output event sets agree even though stamps/uids are fresh"
        );
    }

    #[test]
    fn test_display_order_is_ascending_by_start() {
        let previous = HashSet::new();
        let new = set(&[review(), standup()]);

        let result =
            reconcile(Some(&previous), &new, &ExclusionList::empty(), false).unwrap();

        let order: Vec<&str> = result
            .newly_added
            .iter()
            .map(|e| e.summary.as_str())
            .collect();
        assert_eq!(order, vec!["Standup", "Review"]);
    }
}
