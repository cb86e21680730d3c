//! Snapshot-based undo/redo.
//!
//! The timeline holds whole-document snapshots rather than inverse edits.
//! Snapshots share structure with the live buffer, so each one costs
//! O(log n) to take and keeping many of them is cheap.
//!
//! Keystrokes coalesce: insignificant points (single typed characters,
//! deletions, tabs) are discarded when the next point is recorded, so one
//! undo rolls back to the last significant point (a line break, an external
//! edit, or the initial load).

use std::collections::VecDeque;

use codeview_buffer::StorageSnapshot;
use tracing::debug;

/// What kind of operation produced an undo point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// The document was loaded or replaced wholesale.
    ReloadAll,
    TypingCharacter,
    TypingNewLine,
    /// An edit made by something other than the keyboard, e.g. a refactoring
    /// or a formatter. The name is shown in the Undo menu item.
    AlienEditing { name_for_menu: String },
    /// Tabs, deletions and other editing keys.
    EditingInteraction,
}

impl OperationKind {
    pub fn alien(name_for_menu: impl Into<String>) -> Self {
        Self::AlienEditing {
            name_for_menu: name_for_menu.into(),
        }
    }

    /// Significant points survive coalescing and are undo targets.
    pub fn is_significant(&self) -> bool {
        match self {
            OperationKind::ReloadAll
            | OperationKind::TypingNewLine
            | OperationKind::AlienEditing { .. } => true,
            OperationKind::TypingCharacter | OperationKind::EditingInteraction => false,
        }
    }

    /// Label for an "Undo …"/"Redo …" menu item.
    pub fn name_for_menu(&self) -> &str {
        match self {
            OperationKind::ReloadAll => "",
            OperationKind::TypingCharacter | OperationKind::TypingNewLine => "Typing",
            OperationKind::AlienEditing { name_for_menu } => name_for_menu,
            OperationKind::EditingInteraction => "Editing",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UndoPoint {
    version: u64,
    kind: OperationKind,
    snapshot: StorageSnapshot,
}

impl UndoPoint {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn snapshot(&self) -> &StorageSnapshot {
        &self.snapshot
    }
}

#[derive(Debug, Clone)]
pub struct UndoTimeline {
    /// Oldest first.
    undoable: Vec<UndoPoint>,
    current: UndoPoint,
    /// Newest first: the front is what the next redo restores.
    redoable: VecDeque<UndoPoint>,
    last_version: u64,
}

impl UndoTimeline {
    /// Starts a timeline whose only point is a `ReloadAll` of `snapshot`.
    pub fn new(snapshot: StorageSnapshot) -> Self {
        Self {
            undoable: Vec::new(),
            current: UndoPoint {
                version: 1,
                kind: OperationKind::ReloadAll,
                snapshot,
            },
            redoable: VecDeque::new(),
            last_version: 1,
        }
    }

    pub fn current(&self) -> &UndoPoint {
        &self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.undoable.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redoable.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undoable.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redoable.len()
    }

    /// Menu label for the next undo, if any.
    pub fn undo_action_name(&self) -> Option<&str> {
        self.can_undo().then(|| self.current.kind.name_for_menu())
    }

    /// Menu label for the next redo, if any.
    pub fn redo_action_name(&self) -> Option<&str> {
        self.redoable.front().map(|point| point.kind.name_for_menu())
    }

    /// Records `snapshot` as the new current point.
    ///
    /// Insignificant points at the top of the history are dropped first, then
    /// the current point moves onto the undo stack. Any redo history is
    /// discarded.
    pub fn record(&mut self, snapshot: StorageSnapshot, kind: OperationKind) {
        let coalesced = self.unrecord_insignificant();
        let version = self.next_version();
        let previous = std::mem::replace(
            &mut self.current,
            UndoPoint {
                version,
                kind,
                snapshot,
            },
        );
        self.undoable.push(previous);
        self.redoable.clear();
        debug!(
            version,
            kind = ?self.current.kind,
            coalesced,
            undo_depth = self.undoable.len(),
            "recorded undo point"
        );
    }

    /// Steps back one point and returns the snapshot to install, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&StorageSnapshot> {
        let previous = self.undoable.pop()?;
        let undone = std::mem::replace(&mut self.current, previous);
        debug!(
            from = undone.version,
            to = self.current.version,
            "undo"
        );
        self.redoable.push_front(undone);
        Some(&self.current.snapshot)
    }

    /// Steps forward one point and returns the snapshot to install, or `None`
    /// when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&StorageSnapshot> {
        let next = self.redoable.pop_front()?;
        let redone = std::mem::replace(&mut self.current, next);
        debug!(
            from = redone.version,
            to = self.current.version,
            "redo"
        );
        self.undoable.push(redone);
        Some(&self.current.snapshot)
    }

    /// Pops insignificant points off the top of the history into `current`.
    /// Returns how many were discarded.
    fn unrecord_insignificant(&mut self) -> usize {
        let mut discarded = 0;
        while !self.current.kind.is_significant() {
            match self.undoable.pop() {
                Some(previous) => {
                    self.current = previous;
                    discarded += 1;
                }
                None => break,
            }
        }
        discarded
    }

    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }
}
