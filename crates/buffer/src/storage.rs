//! The edit engine.
//!
//! [`TextStorage`] owns the live [`LineBuffer`], the caret/selection state and
//! the [`ChangeLog`]. Every content change goes through
//! [`TextStorage::replace`]; nothing else mutates the buffer except wholesale
//! [`reset`](TextStorage::reset) and [`restore`](TextStorage::restore).
//!
//! # Example
//!
//! ```
//! use codeview_buffer::{Position, TextRange, TextStorage};
//!
//! let mut storage = TextStorage::new();
//! storage.replace(TextRange::point(Position::ZERO), "hello");
//! let end = storage.replace(TextRange::point(Position::new(0, 5)), "\nworld");
//! assert_eq!(end.upper(), Position::new(1, 5));
//! assert_eq!(storage.lines().export(), "hello\nworld");
//! assert_eq!(storage.caret(), Position::new(1, 5));
//! ```

use tracing::trace;

use crate::change_log::ChangeLog;
use crate::line::{Line, LineKeyAllocator};
use crate::line_buffer::LineBuffer;
use crate::types::{Position, TextRange};

/// Caret and selection.
///
/// The caret is always one of the selection bounds. The anchor is the fixed
/// end of a selection being extended; it is `None` when no extension is in
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorState {
    caret: Position,
    selection_anchor: Option<Position>,
    selection: TextRange,
}

impl EditorState {
    /// Caret and empty selection at `position`, no anchor.
    pub fn at(position: Position) -> Self {
        Self {
            caret: position,
            selection_anchor: None,
            selection: TextRange::point(position),
        }
    }

    pub fn caret(&self) -> Position {
        self.caret
    }

    pub fn selection_anchor(&self) -> Option<Position> {
        self.selection_anchor
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }
}

/// A full copy of document content and caret state.
///
/// Cheap to take: the buffer shares structure with the live one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSnapshot {
    pub lines: LineBuffer,
    pub state: EditorState,
}

#[derive(Debug, Clone)]
pub struct TextStorage {
    lines: LineBuffer,
    state: EditorState,
    change_log: ChangeLog,
    keys: LineKeyAllocator,
}

impl Default for TextStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStorage {
    /// Creates an empty document: one empty line, caret at `(0, 0)`.
    pub fn new() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        let mut keys = LineKeyAllocator::new();
        let lines = LineBuffer::from_text(text, &mut keys);
        Self {
            lines,
            state: EditorState::default(),
            change_log: ChangeLog::new(),
            keys,
        }
    }

    pub fn lines(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn change_log(&self) -> &ChangeLog {
        &self.change_log
    }

    /// Discards pending change records after a consumer has caught up.
    pub fn clean_change_log(&mut self) {
        self.change_log.clean();
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    // ==================== Caret & selection ====================

    pub fn caret(&self) -> Position {
        self.state.caret
    }

    pub fn selection(&self) -> TextRange {
        self.state.selection
    }

    pub fn selection_anchor(&self) -> Option<Position> {
        self.state.selection_anchor
    }

    /// # Panics
    ///
    /// Panics if `position` is not valid in the current buffer.
    pub fn set_caret(&mut self, position: Position) {
        self.assert_valid(position);
        self.state.caret = position;
    }

    /// # Panics
    ///
    /// Panics if either bound is not valid in the current buffer.
    pub fn set_selection(&mut self, range: TextRange) {
        self.lines.assert_valid_range(range);
        self.state.selection = range;
    }

    /// # Panics
    ///
    /// Panics if `anchor` is `Some` and not valid in the current buffer.
    pub fn set_selection_anchor(&mut self, anchor: Option<Position>) {
        if let Some(position) = anchor {
            self.assert_valid(position);
        }
        self.state.selection_anchor = anchor;
    }

    pub fn start_position(&self) -> Position {
        Position::ZERO
    }

    pub fn end_position(&self) -> Position {
        self.lines.end_position()
    }

    /// Places the caret at `position`, collapsing the selection and dropping
    /// the anchor.
    pub fn move_caret(&mut self, position: Position) {
        self.assert_valid(position);
        self.state = EditorState::at(position);
    }

    /// Moves the caret to `position` while keeping the selection's fixed end.
    ///
    /// The fixed end is the existing anchor, or the caret if no selection is
    /// being extended yet.
    pub fn modify_selection_with_anchor(&mut self, position: Position) {
        self.assert_valid(position);
        let anchor = self.state.selection_anchor.unwrap_or(self.state.caret);
        self.state = EditorState {
            caret: position,
            selection_anchor: Some(anchor),
            selection: TextRange::between(anchor, position),
        };
    }

    pub fn select_all(&mut self) {
        let (start, end) = (self.start_position(), self.end_position());
        self.state = EditorState {
            caret: end,
            selection_anchor: Some(start),
            selection: TextRange::new(start, end),
        };
    }

    pub fn selected_text(&self) -> String {
        self.lines.text_in(self.state.selection)
    }

    // ==================== Mutation ====================

    /// Replaces `range` with `text` and returns the range the new text
    /// occupies. Caret, selection and anchor end up at the end of the
    /// inserted text and one change-log entry is appended.
    ///
    /// Replacing an empty range with empty text changes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not valid in the current buffer. Invalid ranges
    /// are never clamped.
    pub fn replace(&mut self, range: TextRange, text: &str) -> TextRange {
        self.lines.assert_valid_range(range);
        if range.is_empty() && text.is_empty() {
            return range;
        }

        let inserted = self.splice(range, text);
        let end = inserted.upper();
        self.state = EditorState {
            caret: end,
            selection_anchor: Some(end),
            selection: TextRange::point(end),
        };
        inserted
    }

    /// Replaces the current selection with `text`.
    pub fn replace_selection(&mut self, text: &str) -> TextRange {
        self.replace(self.state.selection, text)
    }

    fn splice(&mut self, range: TextRange, text: &str) -> TextRange {
        let (lower, upper) = (range.lower(), range.upper());
        let base_snapshot = self.lines.clone();

        let prefix = &self.lines.line_content(lower.line)[..lower.byte];
        let suffix = &self.lines.line_content(upper.line)[upper.byte..];
        let segments: Vec<&str> = text.split('\n').collect();
        let last = segments.len() - 1;

        let end = if last == 0 {
            Position::new(lower.line, prefix.len() + segments[0].len())
        } else {
            Position::new(lower.line + last, segments[last].len())
        };

        let mut new_lines = Vec::with_capacity(segments.len());
        for (i, segment) in segments.iter().enumerate() {
            let mut content = String::new();
            if i == 0 {
                content.push_str(prefix);
            }
            content.push_str(segment);
            if i == last {
                content.push_str(suffix);
            }
            new_lines.push(Line::new(content, &mut self.keys));
        }

        self.lines
            .replace_lines(lower.line..upper.line + 1, new_lines);
        trace!(
            range = %range,
            inserted_bytes = text.len(),
            line_count = self.lines.line_count(),
            "replaced text"
        );
        self.change_log.record(base_snapshot, range, text);
        TextRange::new(lower, end)
    }

    // ==================== Snapshots ====================

    pub fn snapshot(&self) -> StorageSnapshot {
        StorageSnapshot {
            lines: self.lines.clone(),
            state: self.state,
        }
    }

    /// Installs a previously taken snapshot.
    ///
    /// Bypasses the change log; consumers see
    /// [`ChangeLog::requires_full_rebuild`] instead of entries.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot's state is not valid against its own lines.
    pub fn restore(&mut self, snapshot: StorageSnapshot) {
        let StorageSnapshot { lines, state } = snapshot;
        assert!(
            lines.is_valid_position(state.caret)
                && lines.is_valid_range(state.selection)
                && state.selection_anchor.map_or(true, |p| lines.is_valid_position(p)),
            "snapshot state does not fit its lines"
        );
        self.lines = lines;
        self.state = state;
        self.change_log.mark_discontinuity();
    }

    /// Replaces the whole document with `text` and moves the caret to the
    /// start.
    pub fn reset(&mut self, text: &str) {
        self.lines = LineBuffer::from_text(text, &mut self.keys);
        self.state = EditorState::default();
        self.change_log.mark_discontinuity();
    }

    fn assert_valid(&self, position: Position) {
        assert!(
            self.lines.is_valid_position(position),
            "invalid position {} for buffer of {} lines",
            position,
            self.lines.line_count()
        );
    }

    /// Checks every structural invariant, panicking on the first violation.
    pub fn assert_consistent(&self) {
        assert!(self.lines.line_count() >= 1, "buffer lost its last line");
        assert!(self.lines.is_valid_position(self.state.caret), "caret out of bounds");
        assert!(self.lines.is_valid_range(self.state.selection), "selection out of bounds");
        if let Some(anchor) = self.state.selection_anchor {
            assert!(self.lines.is_valid_position(anchor), "anchor out of bounds");
        }
        for line in self.lines.lines() {
            assert!(!line.content().contains('\n'), "line holds a line feed");
            assert_eq!(line.char_count(), line.content().chars().count());
            assert_eq!(
                line.utf16_len(),
                line.content().encode_utf16().count()
            );
        }
    }
}
