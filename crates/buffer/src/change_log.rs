//! Record of replacements since the last time a consumer caught up.
//!
//! Each [`TextStorage::replace`](crate::TextStorage::replace) appends one
//! entry holding the buffer as it was before the edit. A highlighter or
//! renderer walks [`ChangeLog::points`] in order, patches its own state, and
//! calls [`ChangeLog::clean`]. Wholesale state replacement (reset, undo, redo)
//! does not append entries; it raises [`ChangeLog::requires_full_rebuild`]
//! instead.

use crate::line_buffer::LineBuffer;
use crate::types::{DirtyLines, TextRange};

/// One replacement, as seen by a consumer of the log.
#[derive(Debug, Clone)]
pub struct ChangeLogEntry {
    key: u64,
    base_snapshot: LineBuffer,
    replaced_range: TextRange,
    replacement: String,
}

impl ChangeLogEntry {
    /// Log-local sequence number. Monotonic and never reused by the same log.
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The buffer as it was immediately before this replacement.
    pub fn base_snapshot(&self) -> &LineBuffer {
        &self.base_snapshot
    }

    /// The replaced range, expressed against [`Self::base_snapshot`].
    pub fn replaced_range(&self) -> TextRange {
        self.replaced_range
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Number of line breaks the replacement inserted.
    pub fn inserted_line_breaks(&self) -> usize {
        self.replacement.bytes().filter(|&b| b == b'\n').count()
    }

    /// Number of line breaks the replaced range removed.
    pub fn removed_line_breaks(&self) -> usize {
        self.replaced_range.upper().line - self.replaced_range.lower().line
    }

    /// Lines of the resulting buffer affected by this replacement.
    pub fn dirty_lines(&self) -> DirtyLines {
        let first = self.replaced_range.lower().line;
        if self.inserted_line_breaks() == 0 && self.removed_line_breaks() == 0 {
            DirtyLines::Single(first)
        } else {
            DirtyLines::FromLineToEnd(first)
        }
    }

    /// Applies this replacement to a consumer's copy of the line contents.
    ///
    /// `lines` must equal [`Self::base_snapshot`] line for line.
    pub fn apply_to_lines(&self, lines: &mut Vec<String>) {
        let (lower, upper) = (self.replaced_range.lower(), self.replaced_range.upper());
        let prefix = &lines[lower.line][..lower.byte];
        let suffix = &lines[upper.line][upper.byte..];
        let mut replacement: Vec<String> = self
            .replacement
            .split('\n')
            .map(str::to_owned)
            .collect();
        replacement[0].insert_str(0, prefix);
        if let Some(last) = replacement.last_mut() {
            last.push_str(suffix);
        }
        drop(lines.splice(lower.line..upper.line + 1, replacement));
    }
}

/// Ordered, append-only change records between consumer catch-ups.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    next_key: u64,
    points: Vec<ChangeLogEntry>,
    requires_full_rebuild: bool,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, base_snapshot: LineBuffer, replaced_range: TextRange, replacement: &str) {
        let key = self.next_key;
        self.next_key += 1;
        self.points.push(ChangeLogEntry {
            key,
            base_snapshot,
            replaced_range,
            replacement: replacement.to_owned(),
        });
    }

    /// Marks the log as discontinuous: the buffer changed in a way the
    /// recorded entries cannot describe.
    pub(crate) fn mark_discontinuity(&mut self) {
        self.points.clear();
        self.requires_full_rebuild = true;
    }

    /// Entries in the order they happened.
    pub fn points(&self) -> &[ChangeLogEntry] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && !self.requires_full_rebuild
    }

    /// True after reset, undo or redo until the next [`ChangeLog::clean`].
    /// Consumers must rebuild from the current buffer instead of replaying.
    pub fn requires_full_rebuild(&self) -> bool {
        self.requires_full_rebuild
    }

    /// Merged dirty region of every pending change.
    pub fn dirty_lines(&self) -> DirtyLines {
        if self.requires_full_rebuild {
            return DirtyLines::FromLineToEnd(0);
        }
        self.points
            .iter()
            .fold(DirtyLines::None, |mut acc, entry| {
                acc.merge(entry.dirty_lines());
                acc
            })
    }

    /// Drops every entry and clears the rebuild flag. Keys keep increasing.
    pub fn clean(&mut self) {
        self.points.clear();
        self.requires_full_rebuild = false;
    }
}
