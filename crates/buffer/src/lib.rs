//! codeview-buffer: line-oriented text storage for a source code editor.
//!
//! # Overview
//!
//! - [`LineBuffer`]: ordered lines backed by a persistent tree. Indexed access
//!   and splicing are O(log n); cloning is O(1), which makes snapshots cheap.
//! - [`Position`] / [`TextRange`]: `(line, byte)` addressing with strict
//!   validity rules and grapheme-aware neighbors.
//! - [`TextStorage`]: the edit engine. [`TextStorage::replace`] is the single
//!   mutation primitive; it keeps caret and selection valid and appends to
//!   the [`ChangeLog`].
//! - [`ChangeLog`]: ordered replacement records for incremental consumers.
//! - [`DocumentView`]: read-only trait for renderers and highlighters.
//!
//! # Example
//!
//! ```
//! use codeview_buffer::{DirtyLines, DocumentView, Position, TextRange, TextStorage};
//!
//! let mut storage = TextStorage::from_text("fn main() {\n}");
//! storage.replace(TextRange::point(Position::new(0, 11)), "\n    println!();");
//!
//! assert_eq!(storage.line_count(), 3);
//! assert_eq!(storage.lines().line_content(1), "    println!();");
//! assert_eq!(storage.pending_dirty(), DirtyLines::FromLineToEnd(0));
//!
//! let entry = &storage.change_log().points()[0];
//! assert_eq!(entry.base_snapshot().line_count(), 2);
//! storage.clean_change_log();
//! ```

mod change_log;
mod document_view;
pub mod grapheme;
mod line;
mod line_buffer;
mod line_tree;
mod position;
mod storage;
mod types;

pub use change_log::{ChangeLog, ChangeLogEntry};
pub use document_view::{CaretInfo, DocumentView};
pub use line::{Line, LineKey, LineKeyAllocator};
pub use line_buffer::{LineBuffer, Lines};
pub use storage::{EditorState, StorageSnapshot, TextStorage};
pub use types::{DirtyLines, Position, TextRange};
