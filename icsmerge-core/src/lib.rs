//! Reconciliation engine for iCalendar snapshot exports.
//!
//! Given a previous `.ics` snapshot and a new one, this crate computes which
//! events are newly added, which may need manual removal, and produces a
//! merged output calendar, honoring a user-supplied exclusion list matched
//! case-insensitively against event summaries.
//!
//! The pipeline is load -> extract -> filter -> reconcile -> serialize, run
//! synchronously to completion. Presentation is the caller's job: the engine
//! returns reports and buffers, it never prints.

pub mod calendar;
pub mod error;
pub mod event;
pub mod exclusions;
pub mod ics;
pub mod merge;
pub mod reconcile;
pub mod report;

pub use calendar::Calendar;
pub use error::{MergeError, MergeResult};
pub use event::{EventIdentity, EventRecord, EventTime};
pub use exclusions::ExclusionList;
pub use merge::{Analysis, MergeOutcome, MergeRequest};
pub use reconcile::{Reconciliation, reconcile};
pub use report::MergeReports;
