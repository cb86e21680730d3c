//! codeview-editor: the editing session on top of `codeview-buffer`.
//!
//! # Overview
//!
//! - [`CodeEditor`]: owns the document, undo history and line annotations,
//!   and applies [`EditorMessage`]s from the host.
//! - [`UndoTimeline`]: snapshot undo/redo where typed characters coalesce
//!   into one step per line.
//! - [`Annotations`]: breakpoints and diagnostics that move with the lines
//!   they are attached to.
//! - [`EditingConfig`]: tab width and auto-indent preferences, persisted as
//!   JSON.
//!
//! # Example
//!
//! ```
//! use codeview_editor::{CodeEditor, EditingCommand, EditingConfig, EditorMessage};
//!
//! let mut editor = CodeEditor::new(EditingConfig::default());
//! for ch in "fn main() {".chars() {
//!     editor.apply(EditorMessage::PlaceText(ch.to_string()));
//! }
//! editor.apply(EditorMessage::Command(EditingCommand::InsertNewLine));
//! assert_eq!(editor.text(), "fn main() {\n    ");
//!
//! editor.apply(EditorMessage::Undo);
//! assert_eq!(editor.text(), "");
//! ```

pub mod annotation;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod timeline;

pub use annotation::{Annotations, Diagnostic, Severity};
pub use command::{EditingCommand, EditorMessage};
pub use config::EditingConfig;
pub use editor::CodeEditor;
pub use error::{ConfigError, ConfigResult, EditError, EditResult};
pub use timeline::{OperationKind, UndoPoint, UndoTimeline};

pub use codeview_buffer::{DirtyLines, DocumentView, Position, TextRange};
