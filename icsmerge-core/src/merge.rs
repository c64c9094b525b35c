//! Path-level pipeline: the interface the presentation layer calls.
//!
//! One invocation per user-initiated merge or analyze action. The pipeline
//! is synchronous and holds no cross-invocation state; identical inputs give
//! identical results (modulo the freshly generated DTSTAMP/UIDs).

use crate::calendar::Calendar;
use crate::error::{MergeError, MergeResult};
use crate::exclusions::ExclusionList;
use crate::ics::{generate_ics, parse_calendar};
use crate::reconcile::{Reconciliation, reconcile};
use crate::report::{self, MergeReports};
use chrono::NaiveDate;
use std::path::Path;

/// Inputs for one merge or analyze run. All paths are expected to exist;
/// a supplied-but-missing path is a [`MergeError::FileNotFound`].
#[derive(Debug, Clone)]
pub struct MergeRequest<'a> {
    /// Previous snapshot. `None` means first run.
    pub previous: Option<&'a Path>,
    /// New snapshot (required).
    pub new: &'a Path,
    /// Exclusion pattern file, one substring per line.
    pub exclusions: Option<&'a Path>,
    /// Coerce output events to all-day (date-only) granularity.
    pub all_day: bool,
    /// Keep blank lines from the exclusion file as literal (always-matching)
    /// patterns instead of dropping them.
    pub keep_blank_exclusions: bool,
}

/// Everything a successful merge run produces.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub reconciliation: Reconciliation,
    pub reports: MergeReports,
    /// Serialized output calendar, ready to write to disk.
    pub ics: String,
    /// Loader warnings (skipped components), prefixed by snapshot.
    pub warnings: Vec<String>,
}

/// Per-snapshot statistics for the analyze report.
#[derive(Debug, Clone)]
pub struct CalendarStats {
    pub events: usize,
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

/// Result of inspecting the inputs without merging.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub previous: Option<CalendarStats>,
    pub new: CalendarStats,
    pub exclusions: Option<ExclusionList>,
    pub warnings: Vec<String>,
}

/// Run the full pipeline: load both snapshots, filter, reconcile, serialize.
pub fn run(request: &MergeRequest) -> MergeResult<MergeOutcome> {
    let previous = request.previous.map(load_snapshot).transpose()?;
    let new = load_snapshot(request.new)?;
    let exclusions = load_exclusions(request)?;
    let active = exclusions.clone().unwrap_or_else(ExclusionList::empty);

    let previous_identities = previous.as_ref().map(Calendar::identities);
    let new_identities = new.identities();

    let reconciliation = reconcile(
        previous_identities.as_ref(),
        &new_identities,
        &active,
        request.all_day,
    )?;
    let ics = generate_ics(&reconciliation.output)?;
    let reports = report::merge_reports(exclusions.as_ref(), &reconciliation);

    Ok(MergeOutcome {
        warnings: loader_warnings(previous.as_ref(), &new),
        reconciliation,
        reports,
        ics,
    })
}

/// Inspect both snapshots and the exclusion list without merging.
/// `all_day` on the request is ignored here.
pub fn analyze(request: &MergeRequest) -> MergeResult<Analysis> {
    let previous = request.previous.map(load_snapshot).transpose()?;
    let new = load_snapshot(request.new)?;
    let exclusions = load_exclusions(request)?;

    let mut warnings = loader_warnings(previous.as_ref(), &new);
    if let Some(ref previous) = previous {
        if let (Some(new_earliest), Some(prev_earliest)) = (new.earliest(), previous.earliest()) {
            if new_earliest < prev_earliest {
                warnings.push(
                    "the new snapshot has events before the earliest event in the previous snapshot"
                        .to_string(),
                );
            }
        }
        if let (Some(prev_latest), Some(new_latest)) = (previous.latest(), new.latest()) {
            if prev_latest > new_latest {
                warnings.push(
                    "the previous snapshot has events after the latest event in the new snapshot"
                        .to_string(),
                );
            }
        }
    }

    Ok(Analysis {
        previous: previous.as_ref().map(stats),
        new: stats(&new),
        exclusions,
        warnings,
    })
}

fn stats(calendar: &Calendar) -> CalendarStats {
    CalendarStats {
        events: calendar.identities().len(),
        earliest: calendar.earliest(),
        latest: calendar.latest(),
    }
}

fn load_snapshot(path: &Path) -> MergeResult<Calendar> {
    if !path.exists() {
        return Err(MergeError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_calendar(&content)
}

fn load_exclusions(request: &MergeRequest) -> MergeResult<Option<ExclusionList>> {
    let Some(path) = request.exclusions else {
        return Ok(None);
    };
    if !path.exists() {
        return Err(MergeError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(ExclusionList::parse(
        &content,
        request.keep_blank_exclusions,
    )))
}

fn loader_warnings(previous: Option<&Calendar>, new: &Calendar) -> Vec<String> {
    let mut warnings = Vec::new();
    if let Some(previous) = previous {
        for reason in &previous.skipped {
            warnings.push(format!("previous snapshot: {}", reason));
        }
    }
    for reason in &new.skipped {
        warnings.push(format!("new snapshot: {}", reason));
    }
    warnings
}
