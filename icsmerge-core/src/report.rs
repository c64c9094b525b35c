//! Plain-text report rendering.
//!
//! The engine never prints; it hands these strings to the caller, which
//! decides how to present them.

use crate::event::EventIdentity;
use crate::exclusions::ExclusionList;
use crate::merge::Analysis;
use crate::reconcile::Reconciliation;
use std::fmt::Write;

/// The three reports the merge pipeline produces.
#[derive(Debug, Clone)]
pub struct MergeReports {
    pub exclusions: String,
    pub removals: String,
    pub new_events: String,
}

pub fn merge_reports(
    exclusions: Option<&ExclusionList>,
    reconciliation: &Reconciliation,
) -> MergeReports {
    MergeReports {
        exclusions: exclusions_report(exclusions, reconciliation),
        removals: removals_report(reconciliation),
        new_events: new_events_report(reconciliation),
    }
}

fn event_line(event: &EventIdentity) -> String {
    format!("  - {} on {}\n", event.summary, event.start.date().format("%Y-%m-%d"))
}

fn exclusions_report(
    exclusions: Option<&ExclusionList>,
    reconciliation: &Reconciliation,
) -> String {
    let Some(exclusions) = exclusions else {
        return "No exclusions file provided.\n".to_string();
    };
    if exclusions.is_empty() {
        return "Exclusions file was provided, but it was empty.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("Excluding any event(s) matching:\n\n");
    for pattern in exclusions.patterns() {
        let _ = writeln!(out, "  - '{}'", pattern);
    }

    out.push_str("\nExcluded from the new snapshot:\n\n");
    if reconciliation.excluded_new.is_empty() {
        out.push_str("  - None\n");
    } else {
        for event in &reconciliation.excluded_new {
            out.push_str(&event_line(event));
        }
    }

    if !reconciliation.excluded_previous.is_empty() {
        out.push_str("\nExcluded from the previous snapshot:\n\n");
        for event in &reconciliation.excluded_previous {
            out.push_str(&event_line(event));
        }
    }

    out
}

fn removals_report(reconciliation: &Reconciliation) -> String {
    if reconciliation.first_run {
        return "First run detected. No removals from the current calendar are suggested.\n"
            .to_string();
    }
    if reconciliation.possibly_stale.is_empty() {
        return "No suggested removals from the current calendar were found.\n".to_string();
    }

    let mut out = String::from(
        "Consider removing the following events from your calendar.\n\n\
         They existed in the previous snapshot but are not in the new one and\n\
         thus may no longer be relevant:\n\n",
    );
    for event in &reconciliation.possibly_stale {
        out.push_str(&event_line(event));
    }
    out
}

fn new_events_report(reconciliation: &Reconciliation) -> String {
    if reconciliation.newly_added.is_empty() {
        return "No new events were found in the new snapshot.\n".to_string();
    }

    let mut out = format!(
        "There are {} new event(s) in the new snapshot that do not exist in the\n\
         previous one. These event(s) are:\n\n",
        reconciliation.newly_added.len()
    );
    for event in &reconciliation.newly_added {
        out.push_str(&event_line(event));
    }
    out
}

pub fn analysis_report(analysis: &Analysis) -> String {
    let mut out = String::new();

    match &analysis.previous {
        Some(stats) => {
            let _ = writeln!(out, "Previous snapshot contains {} event(s).", stats.events);
            if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
                let _ = writeln!(out, "  - Earliest event: {}", earliest);
                let _ = writeln!(out, "  - Latest event: {}", latest);
            }
        }
        None => out.push_str("No previous snapshot provided.\n"),
    }

    let _ = writeln!(out, "\nNew snapshot contains {} event(s).", analysis.new.events);
    if let (Some(earliest), Some(latest)) = (analysis.new.earliest, analysis.new.latest) {
        let _ = writeln!(out, "  - Earliest event: {}", earliest);
        let _ = writeln!(out, "  - Latest event: {}", latest);
    }

    out.push('\n');
    match &analysis.exclusions {
        None => out.push_str("No exclusions file provided.\n"),
        Some(exclusions) if exclusions.is_empty() => {
            out.push_str("Exclusions file was provided, but it was empty.\n");
        }
        Some(exclusions) => {
            let _ = writeln!(out, "Exclusions file contains {} pattern(s):", exclusions.patterns().len());
            for pattern in exclusions.patterns() {
                let _ = writeln!(out, "  - '{}'", pattern);
            }
        }
    }

    for warning in &analysis.warnings {
        let _ = writeln!(out, "\nWarning: {}", warning);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use crate::exclusions::ExclusionList;
    use crate::reconcile::reconcile;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn review() -> crate::event::EventIdentity {
        crate::event::EventIdentity {
            summary: "Review".to_string(),
            start: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 8, 14, 0, 0).unwrap()),
            end: EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_first_run_report_wording() {
        let new: HashSet<_> = [review()].into_iter().collect();
        let result = reconcile(None, &new, &ExclusionList::empty(), false).unwrap();

        let reports = merge_reports(None, &result);
        assert!(reports.removals.contains("First run detected"));
        assert!(reports.exclusions.contains("No exclusions file provided"));
        assert!(reports.new_events.contains("1 new event(s)"));
        assert!(reports.new_events.contains("  - Review on 2024-01-08"));
    }

    #[test]
    fn test_excluded_events_are_listed() {
        let previous = HashSet::new();
        let new: HashSet<_> = [review()].into_iter().collect();
        let exclusions = ExclusionList::parse("REVIEW", false);
        let result = reconcile(Some(&previous), &new, &exclusions, false).unwrap();

        let reports = merge_reports(Some(&exclusions), &result);
        assert!(reports.exclusions.contains("- 'REVIEW'"));
        assert!(reports.exclusions.contains("- Review on 2024-01-08"));
        assert!(reports.new_events.contains("No new events"));
    }
}
