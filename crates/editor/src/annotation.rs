//! Line annotations: breakpoints and diagnostics keyed by line offset.
//!
//! Annotations are attached to lines, not to text, so every edit that adds or
//! removes line breaks has to move them. [`Annotations::remap`] applies one
//! change-log entry: annotations at or above the edited line stay put, those
//! below shift by the net line delta, and those whose line was swallowed by
//! the edit are dropped.

use std::collections::{BTreeMap, BTreeSet};

use codeview_buffer::ChangeLogEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    breakpoints: BTreeSet<usize>,
    diagnostics: BTreeMap<usize, Vec<Diagnostic>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty() && self.diagnostics.is_empty()
    }

    // ==================== Breakpoints ====================

    /// Adds or removes a breakpoint. Returns true if the line now has one.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        if self.breakpoints.remove(&line) {
            false
        } else {
            self.breakpoints.insert(line);
            true
        }
    }

    pub fn has_breakpoint(&self, line: usize) -> bool {
        self.breakpoints.contains(&line)
    }

    /// Breakpoint lines in ascending order.
    pub fn breakpoints(&self) -> impl Iterator<Item = usize> + '_ {
        self.breakpoints.iter().copied()
    }

    // ==================== Diagnostics ====================

    /// Replaces the diagnostics of `line`. An empty list removes them.
    ///
    /// The list is stored weakest first.
    pub fn set_diagnostics(&mut self, line: usize, mut diagnostics: Vec<Diagnostic>) {
        if diagnostics.is_empty() {
            self.diagnostics.remove(&line);
            return;
        }
        diagnostics.sort_by_key(|d| d.severity);
        self.diagnostics.insert(line, diagnostics);
    }

    pub fn diagnostics(&self, line: usize) -> &[Diagnostic] {
        self.diagnostics.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The strongest severity reported on `line`.
    pub fn max_severity(&self, line: usize) -> Option<Severity> {
        self.diagnostics(line).last().map(|d| d.severity)
    }

    /// Lines carrying diagnostics, ascending.
    pub fn diagnostic_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.diagnostics.keys().copied()
    }

    pub fn clear_diagnostics(&mut self) {
        self.diagnostics.clear();
    }

    // ==================== Remapping ====================

    /// Moves annotations to follow one replacement.
    pub fn remap(&mut self, entry: &ChangeLogEntry) {
        let first = entry.replaced_range().lower().line;
        let removed = entry.removed_line_breaks();
        let added = entry.inserted_line_breaks();
        if removed == 0 && added == 0 {
            return;
        }

        self.breakpoints = std::mem::take(&mut self.breakpoints)
            .into_iter()
            .filter_map(|line| remap_line(line, first, removed, added))
            .collect();
        self.diagnostics = std::mem::take(&mut self.diagnostics)
            .into_iter()
            .filter_map(|(line, list)| remap_line(line, first, removed, added).map(|l| (l, list)))
            .collect();
    }

    /// Drops annotations on lines at or past `line_count`.
    pub fn retain_within(&mut self, line_count: usize) {
        self.breakpoints.retain(|&line| line < line_count);
        self.diagnostics.retain(|&line, _| line < line_count);
    }
}

/// New offset of `line` after an edit starting on line `first` that removed
/// `removed` and inserted `added` line breaks, or `None` if the line no longer
/// exists.
fn remap_line(line: usize, first: usize, removed: usize, added: usize) -> Option<usize> {
    if line <= first {
        return Some(line);
    }
    let moved = (line + added).checked_sub(removed)?;
    (moved > first).then_some(moved)
}
