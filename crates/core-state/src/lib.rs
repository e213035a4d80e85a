//! Editor state: the edited buffer, the primary cursor, the current mode,
//! command input state and the undo engine.
//!
//! Edit batching:
//! - Every command mutates the buffer through [`EditorState::edit`]. The batch
//!   captures a snapshot up front and commits it to the undo stack only when
//!   the buffer actually changed, so a command that patches two characters
//!   undoes as one step and a command that changes nothing leaves no history.
//! - A batch whose closure fails is rolled back to the captured snapshot; no
//!   partial edit survives an error.
//!
//! Telemetry: batch lifecycle emits trace events under `state.edit`; snapshot
//! pushes and pops under `state.undo`.

use core_text::{Buffer, TextView};
use tracing::trace;

pub mod command;
pub mod undo;

pub use command::CommandState;
pub use undo::{EditSnapshot, UNDO_HISTORY_MAX, UndoEngine};

/// High-level modal editing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Normal command/navigation mode.
    Normal,
    /// Insert text mode.
    Insert,
    /// Visual character-wise selection mode.
    VisualChar,
}

/// Classification of a command's edit for yank/undo bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOperation {
    Yank,
    Delete,
    Change,
    /// Edits that neither fill registers nor behave like a plain change.
    Other,
}

pub struct EditorState {
    buffer: Buffer,
    pub cursor: usize,
    pub mode: Mode,
    pub dirty: bool,
    undo: UndoEngine,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: 0,
            mode: Mode::Normal,
            dirty: false,
            undo: UndoEngine::new(),
        }
    }

    /// Construct with the cursor placed at `cursor` (clamped to the text length).
    pub fn with_cursor(buffer: Buffer, cursor: usize) -> Self {
        let cursor = cursor.min(buffer.len_chars());
        Self {
            cursor,
            ..Self::new(buffer)
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Run `f` as one logical edit. See the module docs for commit/rollback rules.
    pub fn edit<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Buffer, &mut usize) -> Result<T, E>,
    {
        let before = EditSnapshot::capture(&self.buffer, self.cursor);
        match f(&mut self.buffer, &mut self.cursor) {
            Ok(value) => {
                if self.buffer != before.buffer {
                    self.undo.push_snapshot(before);
                    self.dirty = true;
                    trace!(target: "state.edit", cursor = self.cursor, undo_depth = self.undo.undo_depth(), "edit_batch_committed");
                } else {
                    trace!(target: "state.edit", cursor = self.cursor, "edit_batch_unchanged");
                }
                Ok(value)
            }
            Err(err) => {
                self.buffer = before.buffer;
                self.cursor = before.cursor;
                trace!(target: "state.edit", cursor = self.cursor, "edit_batch_rolled_back");
                Err(err)
            }
        }
    }

    /// Undo last logical edit. Returns true if applied.
    pub fn undo(&mut self) -> bool {
        self.undo.undo(&mut self.cursor, &mut self.buffer)
    }

    /// Redo previously undone edit. Returns true if applied.
    pub fn redo(&mut self) -> bool {
        self.undo.redo(&mut self.cursor, &mut self.buffer)
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }
}
