//! Rope-based text buffer abstraction.
//!
//! Every offset crossing this crate's API is an absolute *char* index into the
//! buffer (not a byte offset). Line bounds follow the same convention: a line
//! spans `[start, end)` where `end` is the offset of its line terminator, or
//! the end of the text for the final line. The terminator itself never belongs
//! to the line content.
//!
//! The [`TextView`] trait is the narrow seam consumed by editing commands. It
//! exposes exactly what a single-line scan-and-patch needs: read a char, ask
//! for the bounds of the line holding an offset, and replace or erase one char.
//! Anything richer (selections, grapheme-aware motions, undo) belongs to the
//! host.

use ropey::{Rope, RopeSlice};
use thiserror::Error;

/// Errors raised by buffer mutation helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("offset {offset} is out of range (buffer holds {len} chars)")]
    OutOfRange { offset: usize, len: usize },
}

pub type TextResult<T> = Result<T, TextError>;

/// Half-open char range covering the content of one line (terminator excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
    pub start: usize,
    pub end: usize,
}

impl LineBounds {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `offset` addresses a content char of this line.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Minimal read/patch surface over editable text.
pub trait TextView {
    /// Total number of chars in the text.
    fn len_chars(&self) -> usize;

    /// Char at an absolute offset, `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Bounds of the line holding `offset`. Offsets past the end are clamped
    /// to the end of the text (the final line).
    fn line_bounds(&self, offset: usize) -> LineBounds;

    /// Replace the single char at `offset`, returning the char it replaced.
    fn replace_char(&mut self, offset: usize, ch: char) -> TextResult<char>;

    /// Erase the single char at `offset`, returning it.
    fn erase_char(&mut self, offset: usize) -> TextResult<char>;
}

impl<T: TextView + ?Sized> TextView for &mut T {
    fn len_chars(&self) -> usize {
        (**self).len_chars()
    }
    fn char_at(&self, offset: usize) -> Option<char> {
        (**self).char_at(offset)
    }
    fn line_bounds(&self, offset: usize) -> LineBounds {
        (**self).line_bounds(offset)
    }
    fn replace_char(&mut self, offset: usize, ch: char) -> TextResult<char> {
        (**self).replace_char(offset, ch)
    }
    fn erase_char(&mut self, offset: usize) -> TextResult<char> {
        (**self).erase_char(offset)
    }
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    pub name: String,
}

impl Buffer {
    /// Construct a buffer from an in-memory string slice.
    pub fn new(name: impl Into<String>, content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
            name: name.into(),
        }
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the requested line as an owned `String` (including trailing newline if present).
    pub fn line(&self, idx: usize) -> Option<String> {
        if idx < self.rope.len_lines() {
            Some(self.rope.line(idx).to_string())
        } else {
            None
        }
    }

    /// Whole buffer contents as an owned `String`.
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn check_offset(&self, offset: usize) -> TextResult<()> {
        let len = self.rope.len_chars();
        if offset < len {
            Ok(())
        } else {
            Err(TextError::OutOfRange { offset, len })
        }
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for Buffer {}

/// Number of trailing chars forming the line terminator (`\r\n` counts as two).
fn terminator_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' if len >= 2 && line.char(len - 2) == '\r' => 2,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}

impl TextView for Buffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    fn line_bounds(&self, offset: usize) -> LineBounds {
        let offset = offset.min(self.rope.len_chars());
        let line_idx = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line_idx);
        let line = self.rope.line(line_idx);
        let end = start + line.len_chars() - terminator_len(line);
        LineBounds::new(start, end)
    }

    fn replace_char(&mut self, offset: usize, ch: char) -> TextResult<char> {
        self.check_offset(offset)?;
        let old = self.rope.char(offset);
        self.rope.remove(offset..offset + 1);
        self.rope.insert_char(offset, ch);
        Ok(old)
    }

    fn erase_char(&mut self, offset: usize) -> TextResult<char> {
        self.check_offset(offset)?;
        let old = self.rope.char(offset);
        self.rope.remove(offset..offset + 1);
        Ok(old)
    }
}
