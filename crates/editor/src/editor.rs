//! The editing session.
//!
//! [`CodeEditor`] ties the edit engine, the undo timeline and the line
//! annotations together. Every content change goes through
//! [`CodeEditor::replace`], which applies the replacement to the storage and
//! immediately remaps annotations with the change-log entries it produced, so
//! annotations never lag behind the text.

use codeview_buffer::grapheme::{grapheme_boundary_left, is_grapheme_boundary};
use codeview_buffer::{
    CaretInfo, ChangeLog, DirtyLines, DocumentView, EditorState, LineBuffer, Position, TextRange,
    TextStorage,
};
use tracing::info;

use crate::annotation::{Annotations, Diagnostic};
use crate::command::{EditingCommand, EditorMessage};
use crate::config::EditingConfig;
use crate::error::{EditError, EditResult};
use crate::timeline::{OperationKind, UndoTimeline};

#[derive(Debug, Clone)]
pub struct CodeEditor {
    config: EditingConfig,
    storage: TextStorage,
    timeline: UndoTimeline,
    annotations: Annotations,
    /// Character column kept across consecutive vertical moves.
    sticky_column: Option<usize>,
}

impl Default for CodeEditor {
    fn default() -> Self {
        Self::new(EditingConfig::default())
    }
}

impl CodeEditor {
    pub fn new(config: EditingConfig) -> Self {
        Self::with_text(config, "")
    }

    pub fn with_text(config: EditingConfig, text: &str) -> Self {
        let storage = TextStorage::from_text(text);
        let timeline = UndoTimeline::new(storage.snapshot());
        Self {
            config: config.clamped(),
            storage,
            timeline,
            annotations: Annotations::new(),
            sticky_column: None,
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &EditingConfig {
        &self.config
    }

    /// Installs `config`, clamping out-of-range values.
    pub fn set_config(&mut self, config: EditingConfig) {
        self.config = config.clamped();
    }

    pub fn storage(&self) -> &TextStorage {
        &self.storage
    }

    pub fn lines(&self) -> &LineBuffer {
        self.storage.lines()
    }

    pub fn text(&self) -> String {
        self.storage.lines().export()
    }

    pub fn caret(&self) -> Position {
        self.storage.caret()
    }

    pub fn selection(&self) -> TextRange {
        self.storage.selection()
    }

    pub fn timeline(&self) -> &UndoTimeline {
        &self.timeline
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn change_log(&self) -> &ChangeLog {
        self.storage.change_log()
    }

    pub fn clean_change_log(&mut self) {
        self.storage.clean_change_log();
    }

    // ==================== Messages ====================

    /// Handles one message and returns the lines that need redrawing.
    pub fn apply(&mut self, message: EditorMessage) -> DirtyLines {
        if !matches!(message, EditorMessage::Command(command) if command.is_vertical()) {
            self.sticky_column = None;
        }
        match message {
            EditorMessage::Reset(text) => {
                self.reset(&text);
                DirtyLines::FromLineToEnd(0)
            }
            EditorMessage::Edit {
                range,
                text,
                name_for_menu,
            } => self.edit(range, &text, name_for_menu),
            EditorMessage::PlaceText(text) => self.place_text(&text),
            EditorMessage::Paste(text) => self.paste(&text),
            EditorMessage::Command(command) => self.execute(command),
            EditorMessage::Undo => Self::full_redraw_if(self.undo()),
            EditorMessage::Redo => Self::full_redraw_if(self.redo()),
        }
    }

    fn full_redraw_if(changed: bool) -> DirtyLines {
        if changed {
            DirtyLines::FromLineToEnd(0)
        } else {
            DirtyLines::None
        }
    }

    // ==================== Whole-document operations ====================

    /// Replaces the document and starts a new undo history.
    pub fn reset(&mut self, text: &str) {
        self.storage.reset(text);
        self.timeline = UndoTimeline::new(self.storage.snapshot());
        self.annotations.retain_within(self.storage.line_count());
        self.sticky_column = None;
        info!(line_count = self.storage.line_count(), "reset document");
    }

    pub fn can_undo(&self) -> bool {
        self.timeline.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.timeline.can_redo()
    }

    /// Restores the previous undo point. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.timeline.undo().cloned() else {
            return false;
        };
        self.storage.restore(snapshot);
        self.after_restore();
        true
    }

    /// Restores the next redo point. Returns false if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.timeline.redo().cloned() else {
            return false;
        };
        self.storage.restore(snapshot);
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        self.annotations.retain_within(self.storage.line_count());
        self.sticky_column = None;
    }

    /// Records the current document and caret as a new undo point.
    pub fn record_undo_point(&mut self, kind: OperationKind) {
        self.timeline.record(self.storage.snapshot(), kind);
    }

    // ==================== Replacement ====================

    /// Replaces `range` with `text`, moving annotations along with the lines.
    ///
    /// Does not record an undo point; see [`CodeEditor::edit`] for a recorded
    /// programmatic edit.
    ///
    /// # Panics
    ///
    /// Panics if `range` is not valid in the current document.
    pub fn replace(&mut self, range: TextRange, text: &str) -> TextRange {
        self.replace_tracked(range, text).0
    }

    /// Like [`CodeEditor::replace`], but rejects an invalid range instead of
    /// panicking.
    pub fn try_replace(&mut self, range: TextRange, text: &str) -> EditResult<TextRange> {
        if !self.storage.lines().is_valid_range(range) {
            return Err(EditError::InvalidRange(range));
        }
        Ok(self.replace(range, text))
    }

    /// Moves the caret, rejecting positions outside the document.
    pub fn try_move_caret(&mut self, position: Position) -> EditResult<()> {
        if !self.storage.lines().is_valid_position(position) {
            return Err(EditError::InvalidPosition(position));
        }
        self.storage.move_caret(position);
        Ok(())
    }

    /// A programmatic edit recorded as its own undo step.
    pub fn edit(&mut self, range: TextRange, text: &str, name_for_menu: String) -> DirtyLines {
        let (_, dirty) = self.replace_tracked(range, text);
        self.record_undo_point(OperationKind::AlienEditing { name_for_menu });
        dirty
    }

    fn replace_tracked(&mut self, range: TextRange, text: &str) -> (TextRange, DirtyLines) {
        let first_new = self.storage.change_log().len();
        let inserted = self.storage.replace(range, text);

        let mut dirty = DirtyLines::None;
        for entry in &self.storage.change_log().points()[first_new..] {
            self.annotations.remap(entry);
            dirty.merge(entry.dirty_lines());
        }
        (inserted, dirty)
    }

    fn replace_selection(&mut self, text: &str) -> DirtyLines {
        self.replace_tracked(self.storage.selection(), text).1
    }

    // ==================== Annotations ====================

    /// Toggles the breakpoint on `line`. Returns true if the line now has one.
    ///
    /// # Panics
    ///
    /// Panics if `line` is outside the document.
    pub fn toggle_breakpoint(&mut self, line: usize) -> bool {
        self.assert_line(line);
        self.annotations.toggle_breakpoint(line)
    }

    pub fn try_toggle_breakpoint(&mut self, line: usize) -> EditResult<bool> {
        if line >= self.storage.line_count() {
            return Err(EditError::InvalidLine(line));
        }
        Ok(self.annotations.toggle_breakpoint(line))
    }

    /// Replaces the diagnostics shown on `line`.
    ///
    /// # Panics
    ///
    /// Panics if `line` is outside the document.
    pub fn set_diagnostics(&mut self, line: usize, diagnostics: Vec<Diagnostic>) {
        self.assert_line(line);
        self.annotations.set_diagnostics(line, diagnostics);
    }

    pub fn clear_diagnostics(&mut self) {
        self.annotations.clear_diagnostics();
    }

    fn assert_line(&self, line: usize) {
        assert!(
            line < self.storage.line_count(),
            "line {} out of bounds for document of {} lines",
            line,
            self.storage.line_count()
        );
    }

    // ==================== Typing ====================

    /// Types `text` over the selection.
    pub fn place_text(&mut self, text: &str) -> DirtyLines {
        self.replace_selection_recorded(text, OperationKind::TypingCharacter)
    }

    /// Replaces the selection with `text` and records `kind`. Typing nothing
    /// over an empty selection changes nothing and records nothing.
    fn replace_selection_recorded(&mut self, text: &str, kind: OperationKind) -> DirtyLines {
        if text.is_empty() && self.storage.selection().is_empty() {
            return DirtyLines::None;
        }
        let before = *self.storage.state();
        let mut dirty = self.replace_selection(text);
        self.record_undo_point(kind);
        dirty.merge(self.selection_dirty(before));
        dirty
    }

    // ==================== Clipboard ====================

    /// The selected text, lines joined with `\n`. Empty when nothing is
    /// selected.
    pub fn copy(&self) -> String {
        self.storage.selected_text()
    }

    /// Removes the selection and returns its text, recorded as its own undo
    /// step. Returns an empty string and changes nothing when nothing is
    /// selected.
    pub fn cut(&mut self) -> String {
        let text = self.copy();
        self.replace_selection_recorded("", OperationKind::alien("Cut"));
        text
    }

    /// Replaces the selection with `text` as a single undo step.
    pub fn paste(&mut self, text: &str) -> DirtyLines {
        self.replace_selection_recorded(text, OperationKind::alien("Paste"))
    }

    fn insert_newline(&mut self) -> DirtyLines {
        let mut text = String::from("\n");
        if self.config.auto_indent {
            text.push_str(&self.indent_for_new_line());
        }
        self.replace_selection_recorded(&text, OperationKind::TypingNewLine)
    }

    /// Indentation for a line break at the selection start: the leading
    /// indent units of the text kept on the upper line, plus one level if that
    /// text ends with the configured opener.
    fn indent_for_new_line(&self) -> String {
        let unit = self.config.tab_replacement();
        let lower = self.storage.selection().lower();
        let head = &self.storage.lines().line_content(lower.line)[..lower.byte];

        let mut levels = 0;
        if !unit.is_empty() {
            let mut rest = head;
            while let Some(stripped) = rest.strip_prefix(unit.as_str()) {
                levels += 1;
                rest = stripped;
            }
        }
        let opener = self.config.indent_start.as_str();
        if !opener.is_empty() && head.trim_end().ends_with(opener) {
            levels += 1;
        }
        unit.repeat(levels)
    }

    fn insert_tab(&mut self) -> DirtyLines {
        let unit = self.config.tab_replacement();
        self.replace_selection_recorded(&unit, OperationKind::EditingInteraction)
    }

    /// Removes leading spaces from the caret line back to the previous
    /// indentation stop.
    fn insert_backtab(&mut self) -> DirtyLines {
        let line = self.storage.caret().line;
        let content = self.storage.lines().line_content(line);
        let spaces = content.len() - content.trim_start_matches(' ').len();
        if spaces == 0 {
            return DirtyLines::None;
        }
        let width = self.config.tab_space_count.max(1);
        let remove = spaces - (spaces - 1) / width * width;
        self.delete_range(TextRange::new(Position::new(line, 0), Position::new(line, remove)))
    }

    // ==================== Deletion ====================

    fn delete_backward(&mut self) -> DirtyLines {
        let range = self.selection_or(|lines, caret| {
            TextRange::new(lines.left_neighbor(caret), caret)
        });
        self.delete_range(range)
    }

    fn delete_forward(&mut self) -> DirtyLines {
        let range = self.selection_or(|lines, caret| {
            TextRange::new(caret, lines.right_neighbor(caret))
        });
        self.delete_range(range)
    }

    fn delete_to_beginning_of_line(&mut self) -> DirtyLines {
        let range = self.selection_or(|_, caret| {
            TextRange::new(Position::new(caret.line, 0), caret)
        });
        self.delete_range(range)
    }

    fn delete_to_end_of_line(&mut self) -> DirtyLines {
        let range = self.selection_or(|lines, caret| {
            TextRange::new(caret, Position::new(caret.line, lines.line(caret.line).len()))
        });
        self.delete_range(range)
    }

    /// The selection, or the range `extend` derives from the caret when the
    /// selection is empty.
    fn selection_or(&self, extend: impl FnOnce(&LineBuffer, Position) -> TextRange) -> TextRange {
        let selection = self.storage.selection();
        if selection.is_empty() {
            extend(self.storage.lines(), self.storage.caret())
        } else {
            selection
        }
    }

    fn delete_range(&mut self, range: TextRange) -> DirtyLines {
        if range.is_empty() {
            return DirtyLines::None;
        }
        let before = *self.storage.state();
        let (_, mut dirty) = self.replace_tracked(range, "");
        self.record_undo_point(OperationKind::EditingInteraction);
        dirty.merge(self.selection_dirty(before));
        dirty
    }

    // ==================== Caret movement ====================

    fn execute(&mut self, command: EditingCommand) -> DirtyLines {
        use EditingCommand::*;

        if command.is_mutation() {
            return match command {
                InsertNewLine => self.insert_newline(),
                InsertTab => self.insert_tab(),
                InsertBacktab => self.insert_backtab(),
                DeleteBackward => self.delete_backward(),
                DeleteForward => self.delete_forward(),
                DeleteToBeginningOfLine => self.delete_to_beginning_of_line(),
                DeleteToEndOfLine => self.delete_to_end_of_line(),
                _ => DirtyLines::None,
            };
        }

        let before = *self.storage.state();
        if command == SelectAll {
            self.storage.select_all();
            return self.selection_dirty(before);
        }

        let target = self.movement_target(command);
        if command.modifies_selection() {
            self.storage.modify_selection_with_anchor(target);
        } else {
            self.storage.move_caret(target);
        }
        self.selection_dirty(before)
    }

    fn movement_target(&mut self, command: EditingCommand) -> Position {
        use EditingCommand::*;

        let lines = self.storage.lines();
        let caret = self.storage.caret();
        let selection = self.storage.selection();
        match command {
            // A plain horizontal move collapses a selection to its near edge.
            MoveLeft if !selection.is_empty() => selection.lower(),
            MoveRight if !selection.is_empty() => selection.upper(),
            MoveLeft | MoveLeftAndModifySelection => lines.left_neighbor(caret),
            MoveRight | MoveRightAndModifySelection => lines.right_neighbor(caret),
            MoveToLeftEndOfLine | MoveToLeftEndOfLineAndModifySelection => {
                Position::new(caret.line, 0)
            }
            MoveToRightEndOfLine | MoveToRightEndOfLineAndModifySelection => {
                Position::new(caret.line, lines.line(caret.line).len())
            }
            MoveToBeginningOfDocument | MoveToBeginningOfDocumentAndModifySelection => {
                self.storage.start_position()
            }
            MoveToEndOfDocument | MoveToEndOfDocumentAndModifySelection => {
                self.storage.end_position()
            }
            MoveUp | MoveUpAndModifySelection => self.vertical_target(false),
            MoveDown | MoveDownAndModifySelection => self.vertical_target(true),
            _ => caret,
        }
    }

    /// Target of moving one line up or down, keeping the character column of
    /// the first move in a run. Moving past the first or last line goes to
    /// the document start or end.
    fn vertical_target(&mut self, down: bool) -> Position {
        let lines = self.storage.lines();
        let caret = self.storage.caret();
        let column = *self
            .sticky_column
            .get_or_insert_with(|| lines.line(caret.line).char_offset_of(caret.byte));

        let target_line = if down {
            if caret.line + 1 >= lines.line_count() {
                return lines.end_position();
            }
            caret.line + 1
        } else {
            if caret.line == 0 {
                return Position::ZERO;
            }
            caret.line - 1
        };

        let content = lines.line_content(target_line);
        let byte = lines.line(target_line).byte_offset_of_char(column);
        let byte = if is_grapheme_boundary(content, byte) {
            byte
        } else {
            grapheme_boundary_left(content, byte)
        };
        Position::new(target_line, byte)
    }

    /// Lines whose caret or selection highlight changed since `before`.
    fn selection_dirty(&self, before: EditorState) -> DirtyLines {
        let after = *self.storage.state();
        if after == before {
            return DirtyLines::None;
        }
        let from = before.selection().lower().line.min(after.selection().lower().line);
        let to = before.selection().upper().line.max(after.selection().upper().line) + 1;
        if to - from == 1 {
            DirtyLines::Single(from)
        } else {
            DirtyLines::Range { from, to }
        }
    }
}

impl DocumentView for CodeEditor {
    fn line_count(&self) -> usize {
        self.storage.line_count()
    }

    fn line_content(&self, line: usize) -> Option<&str> {
        DocumentView::line_content(&self.storage, line)
    }

    fn line_utf16_len(&self, line: usize) -> usize {
        self.storage.line_utf16_len(line)
    }

    fn is_valid_position(&self, position: Position) -> bool {
        self.storage.lines().is_valid_position(position)
    }

    fn caret_info(&self) -> Option<CaretInfo> {
        self.storage.caret_info()
    }

    fn selection_range(&self) -> Option<TextRange> {
        DocumentView::selection_range(&self.storage)
    }

    fn pending_dirty(&self) -> DirtyLines {
        self.storage.pending_dirty()
    }
}
