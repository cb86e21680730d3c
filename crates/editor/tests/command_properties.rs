//! Property tests: random message sequences never leave the session in an
//! inconsistent state, and undoing everything returns to the loaded text.

use codeview_editor::{
    CodeEditor, DocumentView, EditingCommand, EditingConfig, EditorMessage,
};
use proptest::prelude::*;

const COMMANDS: &[EditingCommand] = &[
    EditingCommand::MoveLeft,
    EditingCommand::MoveRight,
    EditingCommand::MoveUp,
    EditingCommand::MoveDown,
    EditingCommand::MoveToLeftEndOfLine,
    EditingCommand::MoveToRightEndOfLine,
    EditingCommand::MoveToBeginningOfDocument,
    EditingCommand::MoveToEndOfDocument,
    EditingCommand::MoveLeftAndModifySelection,
    EditingCommand::MoveRightAndModifySelection,
    EditingCommand::MoveUpAndModifySelection,
    EditingCommand::MoveDownAndModifySelection,
    EditingCommand::MoveToLeftEndOfLineAndModifySelection,
    EditingCommand::MoveToRightEndOfLineAndModifySelection,
    EditingCommand::SelectAll,
    EditingCommand::InsertNewLine,
    EditingCommand::InsertTab,
    EditingCommand::InsertBacktab,
    EditingCommand::DeleteBackward,
    EditingCommand::DeleteForward,
    EditingCommand::DeleteToBeginningOfLine,
    EditingCommand::DeleteToEndOfLine,
];

fn message() -> impl Strategy<Value = EditorMessage> {
    prop_oneof![
        4 => prop::sample::select(COMMANDS).prop_map(EditorMessage::Command),
        4 => "[a-z{} é😀]{1,3}".prop_map(EditorMessage::PlaceText),
        1 => "[a-z\n]{0,6}".prop_map(EditorMessage::Paste),
        1 => Just(EditorMessage::Undo),
        1 => Just(EditorMessage::Redo),
    ]
}

proptest! {
    #[test]
    fn test_random_sessions_stay_consistent(
        initial in "[a-z{ \n]{0,24}",
        messages in prop::collection::vec(message(), 0..60),
    ) {
        let mut editor = CodeEditor::with_text(EditingConfig::default(), &initial);
        for message in messages {
            editor.apply(message);
            editor.storage().assert_consistent();
            for line in editor.annotations().breakpoints() {
                prop_assert!(line < editor.line_count());
            }
        }

        while editor.can_undo() {
            editor.apply(EditorMessage::Undo);
        }
        prop_assert_eq!(editor.text(), initial);
    }

    #[test]
    fn test_breakpoints_stay_within_document(
        initial in "[a-z\n]{0,24}",
        messages in prop::collection::vec(message(), 0..40),
    ) {
        let mut editor = CodeEditor::with_text(EditingConfig::default(), &initial);
        for line in 0..editor.line_count() {
            editor.toggle_breakpoint(line);
        }
        for message in messages {
            editor.apply(message);
            for line in editor.annotations().breakpoints() {
                prop_assert!(line < editor.line_count());
            }
        }
    }
}
