//! Read-only view of a document for external collaborators.
//!
//! Layout, rendering and syntax highlighting live outside this crate. They
//! talk to a document through [`DocumentView`], which exposes line access,
//! caret display information and the pending dirty region. The trait is
//! object-safe, so collaborators can hold `&dyn DocumentView`.

use crate::storage::TextStorage;
use crate::types::{DirtyLines, Position, TextRange};

/// Caret display information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretInfo {
    /// Caret position in the document.
    pub position: Position,
    /// False while a non-empty selection is shown instead of the caret.
    pub visible: bool,
}

impl CaretInfo {
    pub fn new(position: Position, visible: bool) -> Self {
        Self { position, visible }
    }
}

pub trait DocumentView {
    /// Returns the total number of lines. Always at least 1.
    fn line_count(&self) -> usize;

    /// Returns the content of the given line, or `None` past the end.
    fn line_content(&self, line: usize) -> Option<&str>;

    /// Returns the length of the given line in UTF-8 bytes.
    ///
    /// Returns 0 if the line index is out of bounds.
    fn line_len(&self, line: usize) -> usize {
        self.line_content(line).map_or(0, str::len)
    }

    /// Returns the length of the given line in UTF-16 code units.
    ///
    /// Returns 0 if the line index is out of bounds.
    fn line_utf16_len(&self, line: usize) -> usize;

    fn is_valid_position(&self, position: Position) -> bool;

    /// Returns caret information for display, or `None` for a view without
    /// a caret.
    fn caret_info(&self) -> Option<CaretInfo>;

    /// Returns the selection if it is non-empty.
    fn selection_range(&self) -> Option<TextRange> {
        None
    }

    /// Lines changed since the change log was last cleaned.
    ///
    /// Unlike draining, this does not reset anything; the owner cleans the
    /// log once every consumer has caught up.
    fn pending_dirty(&self) -> DirtyLines;
}

impl DocumentView for TextStorage {
    fn line_count(&self) -> usize {
        self.lines().line_count()
    }

    fn line_content(&self, line: usize) -> Option<&str> {
        self.lines().get(line).map(|l| l.content())
    }

    fn line_utf16_len(&self, line: usize) -> usize {
        self.lines().get(line).map_or(0, |l| l.utf16_len())
    }

    fn is_valid_position(&self, position: Position) -> bool {
        self.lines().is_valid_position(position)
    }

    fn caret_info(&self) -> Option<CaretInfo> {
        Some(CaretInfo::new(self.caret(), self.selection().is_empty()))
    }

    fn selection_range(&self) -> Option<TextRange> {
        let selection = self.selection();
        (!selection.is_empty()).then_some(selection)
    }

    fn pending_dirty(&self) -> DirtyLines {
        self.change_log().dirty_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(storage: &TextStorage) -> &dyn DocumentView {
        storage
    }

    #[test]
    fn test_line_access() {
        let storage = TextStorage::from_text("ab\nc😀");
        let v = view(&storage);
        assert_eq!(v.line_count(), 2);
        assert_eq!(v.line_content(1), Some("c😀"));
        assert_eq!(v.line_content(2), None);
        assert_eq!(v.line_len(1), 5);
        assert_eq!(v.line_utf16_len(1), 3);
        assert_eq!(v.line_len(7), 0);
    }

    #[test]
    fn test_caret_hidden_while_selecting() {
        let mut storage = TextStorage::from_text("hello");
        assert_eq!(
            view(&storage).caret_info(),
            Some(CaretInfo::new(Position::ZERO, true))
        );
        assert_eq!(view(&storage).selection_range(), None);

        storage.modify_selection_with_anchor(Position::new(0, 3));
        let info = view(&storage).caret_info();
        assert_eq!(info, Some(CaretInfo::new(Position::new(0, 3), false)));
        assert_eq!(
            view(&storage).selection_range(),
            Some(TextRange::new(Position::ZERO, Position::new(0, 3)))
        );
    }

    #[test]
    fn test_pending_dirty_tracks_change_log() {
        let mut storage = TextStorage::from_text("a\nb\nc");
        assert_eq!(view(&storage).pending_dirty(), DirtyLines::None);

        storage.replace(TextRange::point(Position::new(1, 1)), "x");
        assert_eq!(view(&storage).pending_dirty(), DirtyLines::Single(1));

        storage.replace(TextRange::point(Position::new(2, 0)), "\n");
        assert_eq!(view(&storage).pending_dirty(), DirtyLines::FromLineToEnd(1));

        storage.clean_change_log();
        assert_eq!(view(&storage).pending_dirty(), DirtyLines::None);
    }
}
