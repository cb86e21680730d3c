//! Messages accepted by [`CodeEditor::apply`](crate::CodeEditor::apply).
//!
//! Input capture lives in the host. It translates key presses and text input
//! into these messages and feeds them to the editor one at a time.

use codeview_buffer::TextRange;

/// Key-bound editing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditingCommand {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveToLeftEndOfLine,
    MoveToRightEndOfLine,
    MoveToBeginningOfDocument,
    MoveToEndOfDocument,

    MoveLeftAndModifySelection,
    MoveRightAndModifySelection,
    MoveUpAndModifySelection,
    MoveDownAndModifySelection,
    MoveToLeftEndOfLineAndModifySelection,
    MoveToRightEndOfLineAndModifySelection,
    MoveToBeginningOfDocumentAndModifySelection,
    MoveToEndOfDocumentAndModifySelection,

    SelectAll,

    InsertNewLine,
    InsertTab,
    /// Outdent the caret line to the previous indentation stop.
    InsertBacktab,
    DeleteBackward,
    DeleteForward,
    DeleteToBeginningOfLine,
    DeleteToEndOfLine,
}

impl EditingCommand {
    /// True for commands that extend the selection instead of moving the caret.
    pub fn modifies_selection(self) -> bool {
        matches!(
            self,
            EditingCommand::MoveLeftAndModifySelection
                | EditingCommand::MoveRightAndModifySelection
                | EditingCommand::MoveUpAndModifySelection
                | EditingCommand::MoveDownAndModifySelection
                | EditingCommand::MoveToLeftEndOfLineAndModifySelection
                | EditingCommand::MoveToRightEndOfLineAndModifySelection
                | EditingCommand::MoveToBeginningOfDocumentAndModifySelection
                | EditingCommand::MoveToEndOfDocumentAndModifySelection
        )
    }

    /// True for commands that change document content.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            EditingCommand::InsertNewLine
                | EditingCommand::InsertTab
                | EditingCommand::InsertBacktab
                | EditingCommand::DeleteBackward
                | EditingCommand::DeleteForward
                | EditingCommand::DeleteToBeginningOfLine
                | EditingCommand::DeleteToEndOfLine
        )
    }

    /// True for vertical movement, which keeps the sticky column.
    pub(crate) fn is_vertical(self) -> bool {
        matches!(
            self,
            EditingCommand::MoveUp
                | EditingCommand::MoveDown
                | EditingCommand::MoveUpAndModifySelection
                | EditingCommand::MoveDownAndModifySelection
        )
    }
}

/// Everything the editor can be asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMessage {
    /// Replace the whole document and start a fresh undo history.
    Reset(String),
    /// A programmatic edit, recorded as its own undo step under `name_for_menu`.
    Edit {
        range: TextRange,
        text: String,
        name_for_menu: String,
    },
    /// Text typed at the caret, replacing the selection.
    PlaceText(String),
    /// Pasted text, replacing the selection as its own undo step.
    Paste(String),
    Command(EditingCommand),
    Undo,
    Redo,
}
