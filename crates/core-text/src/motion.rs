//! Logical-line and word motion helpers.
//!
//! These operate purely on a `GapBuffer` plus a position and are free of
//! screen geometry; wrapped-line motion lives in `layout`.

use crate::gap_buffer::GapBuffer;
use crate::is_line_end;

/// Start of the logical line containing `pos`. A terminator belongs to the
/// line it ends.
pub fn line_start(buf: &GapBuffer, pos: usize) -> usize {
    let mut pos = pos.min(buf.len());
    while pos > 0 && !is_line_end(buf.char_at(pos - 1)) {
        pos -= 1;
    }
    pos
}

/// Position of the terminator ending the logical line containing `pos`, or
/// `len` for the last line.
pub fn line_end(buf: &GapBuffer, pos: usize) -> usize {
    let len = buf.len();
    let mut pos = pos.min(len);
    while pos < len && !is_line_end(buf.char_at(pos)) {
        pos += 1;
    }
    pos
}

/// ASCII alphanumerics and underscore.
#[inline]
pub fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Start of the next word: skip the rest of the current word, then any
/// separators.
pub fn word_right(buf: &GapBuffer, pos: usize) -> usize {
    let len = buf.len();
    let mut pos = pos.min(len);
    while pos < len && is_word_char(buf.char_at(pos)) {
        pos += 1;
    }
    while pos < len && !is_word_char(buf.char_at(pos)) {
        pos += 1;
    }
    pos
}

/// Start of the previous word.
pub fn word_left(buf: &GapBuffer, pos: usize) -> usize {
    let pos = pos.min(buf.len());
    if pos == 0 {
        return 0;
    }
    let mut pos = pos - 1;
    while pos > 0 && !is_word_char(buf.char_at(pos)) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(buf.char_at(pos - 1)) {
        pos -= 1;
    }
    pos
}

/// Terminators in `[from, to)`.
pub fn count_terminators(buf: &GapBuffer, from: usize, to: usize) -> usize {
    let to = to.min(buf.len());
    (from.min(to)..to)
        .filter(|&i| is_line_end(buf.char_at(i)))
        .count()
}

/// Logical line count: terminators + 1.
pub fn count_lines(buf: &GapBuffer) -> usize {
    count_terminators(buf, 0, buf.len()) + 1
}

/// Where a walk to 0-based logical line `line` ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTarget {
    pub pos: usize,
    /// 0-based line actually reached (less than requested when the buffer
    /// has fewer lines).
    pub line: usize,
}

/// Walk terminators from the buffer start until `line` of them have been
/// passed or the buffer ends.
pub fn seek_line(buf: &GapBuffer, line: usize) -> LineTarget {
    let len = buf.len();
    let mut reached = 0;
    let mut pos = 0;
    while pos < len && reached < line {
        if is_line_end(buf.char_at(pos)) {
            reached += 1;
        }
        pos += 1;
    }
    LineTarget { pos, line: reached }
}
