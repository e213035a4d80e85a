use core_text::Buffer;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Maximum number of snapshots retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 200;

/// A full-state snapshot for undo/redo (coarse clone for simplicity).
#[derive(Debug, Clone)]
pub struct EditSnapshot {
    pub buffer: Buffer,
    pub cursor: usize,
    /// Content hash of the buffer at snapshot capture.
    pub hash: u64,
}

impl EditSnapshot {
    pub fn capture(buffer: &Buffer, cursor: usize) -> Self {
        Self {
            buffer: buffer.clone(),
            cursor,
            hash: buffer_hash(buffer),
        }
    }
}

pub struct UndoEngine {
    undo_stack: Vec<EditSnapshot>,
    redo_stack: Vec<EditSnapshot>,
    /// Count of snapshots skipped due to identical successive state.
    undo_snapshots_skipped: AtomicU64,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            undo_snapshots_skipped: AtomicU64::new(0),
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn snapshots_skipped(&self) -> u64 {
        self.undo_snapshots_skipped.load(Ordering::Relaxed)
    }

    /// Record the pre-edit state of one logical edit.
    pub fn push_snapshot(&mut self, snap: EditSnapshot) {
        if let Some(last) = self.undo_stack.last()
            && last.hash == snap.hash
            && last.buffer == snap.buffer
        {
            self.undo_snapshots_skipped.fetch_add(1, Ordering::Relaxed);
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), hash = snap.hash, "snapshot_dedupe_skip");
            return;
        }
        let hash = snap.hash;
        self.undo_stack.push(snap);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), hash, "push_snapshot");
        if self.undo_stack.len() > UNDO_HISTORY_MAX {
            let _ = self.undo_stack.remove(0);
            trace!(target: "state.undo", "undo_stack_trimmed");
        }
        self.redo_stack.clear();
        trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
    }

    pub fn undo(&mut self, cursor: &mut usize, buffer: &mut Buffer) -> bool {
        if let Some(last) = self.undo_stack.pop() {
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
            self.redo_stack.push(EditSnapshot::capture(buffer, *cursor));
            trace!(target: "state.undo", redo_depth = self.redo_stack.len(), "redo_push_from_undo");
            *buffer = last.buffer;
            *cursor = last.cursor;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self, cursor: &mut usize, buffer: &mut Buffer) -> bool {
        if let Some(next) = self.redo_stack.pop() {
            trace!(target: "state.undo", redo_depth = self.redo_stack.len(), undo_depth = self.undo_stack.len(), "redo_pop");
            self.undo_stack.push(EditSnapshot::capture(buffer, *cursor));
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "undo_push_from_redo");
            *buffer = next.buffer;
            *cursor = next.cursor;
            true
        } else {
            false
        }
    }
}

fn buffer_hash(buf: &Buffer) -> u64 {
    let mut h = DefaultHasher::new();
    for i in 0..buf.line_count() {
        if let Some(l) = buf.line(i) {
            h.write(l.as_bytes());
        }
    }
    h.finish()
}
