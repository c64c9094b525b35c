//! Exclusion list loading and matching.
//!
//! An exclusion is a user-supplied substring. Any event whose summary
//! contains one of them (case-insensitively) is removed from consideration
//! on both sides of the reconciliation.

use crate::event::EventIdentity;
use std::collections::HashSet;

/// An ordered list of exclusion patterns. Order is irrelevant to matching
/// (each pattern is tested independently) but preserved for display.
#[derive(Debug, Clone, Default)]
pub struct ExclusionList {
    patterns: Vec<String>,
}

impl ExclusionList {
    /// A list that excludes nothing.
    pub fn empty() -> Self {
        ExclusionList::default()
    }

    /// Parse a newline-delimited pattern file. Every line is trimmed.
    ///
    /// Lines that become empty after trimming are dropped unless
    /// `keep_blank_lines` is set: a blank pattern is a substring of every
    /// summary and would exclude everything. Callers that want that literal
    /// behavior must ask for it explicitly.
    pub fn parse(text: &str, keep_blank_lines: bool) -> Self {
        let patterns = text
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| keep_blank_lines || !line.is_empty())
            .collect();
        ExclusionList { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches this summary, case-insensitively.
    pub fn matches(&self, summary: &str) -> bool {
        let summary = summary.to_lowercase();
        self.patterns
            .iter()
            .any(|pattern| summary.contains(&pattern.to_lowercase()))
    }

    /// Partition an event set into (kept, excluded).
    pub fn partition(
        &self,
        events: &HashSet<EventIdentity>,
    ) -> (HashSet<EventIdentity>, HashSet<EventIdentity>) {
        let mut kept = HashSet::new();
        let mut excluded = HashSet::new();
        for event in events {
            if self.matches(&event.summary) {
                excluded.insert(event.clone());
            } else {
                kept.insert(event.clone());
            }
        }
        (kept, excluded)
    }
}
