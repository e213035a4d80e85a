//! Single-line delimiter locator.
//!
//! The scan starts *at* the cursor (the char under the cursor is examined
//! first) and never leaves the cursor's line: backward scans stop after the
//! line start (inclusive), forward scans stop before the line end (exclusive,
//! the terminator is never examined).

use core_text::TextView;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Absolute offset of the first `target` met scanning from `cursor` in
/// `direction`, or `None` when the line bound is reached first.
pub fn locate<V: TextView + ?Sized>(
    view: &V,
    cursor: usize,
    target: char,
    direction: Direction,
) -> Option<usize> {
    let cursor = cursor.min(view.len_chars());
    let bounds = view.line_bounds(cursor);
    let found = match direction {
        Direction::Forward => (cursor..bounds.end).find(|&pt| view.char_at(pt) == Some(target)),
        Direction::Backward => (bounds.start..=cursor)
            .rev()
            .find(|&pt| view.char_at(pt) == Some(target)),
    };
    trace!(
        target: "actions.locate",
        cursor,
        line_start = bounds.start,
        line_end = bounds.end,
        needle = %target.escape_debug(),
        ?direction,
        ?found,
        "locate"
    );
    found
}
