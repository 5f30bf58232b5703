//! Visual layout: logical positions to wrapped screen lines.
//!
//! A *logical line* runs between terminators. A *visual line* is a logical
//! line further split whenever the simulated column reaches `screen_cols`.
//! Column advance: a regular byte moves one column, a tab moves to the next
//! multiple of `tab_width`, a terminator ends the visual line and resets the
//! column to 0. A tab that would cross the right edge ends its visual line
//! at the edge.
//!
//! Every function here is pure over the buffer contents plus the geometry in
//! [`VisualLayout`]. All scans are bounded by the current logical line
//! (or the two preceding terminators for [`VisualLayout::visual_line_previous`]).

use crate::gap_buffer::GapBuffer;
use crate::is_line_end;
use crate::motion::line_start;

pub const TAB: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualLayout {
    pub screen_cols: usize,
    pub tab_width: usize,
}

/// Screen offset of a position relative to the first visible visual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOffset {
    pub row: usize,
    pub col: usize,
}

impl VisualLayout {
    pub fn new(screen_cols: usize, tab_width: usize) -> Self {
        Self {
            screen_cols: screen_cols.max(1),
            tab_width: tab_width.max(1),
        }
    }

    /// Column reached by a tab starting at `col`.
    #[inline]
    pub fn next_tab(&self, col: usize) -> usize {
        (col / self.tab_width + 1) * self.tab_width
    }

    /// Cells a tab occupies when it starts at `col`.
    #[inline]
    pub fn tab_span(&self, col: usize) -> usize {
        self.tab_width - col % self.tab_width
    }

    /// Column after drawing `byte` at `col` (terminators are the caller's concern).
    #[inline]
    pub fn advance(&self, col: usize, byte: u8) -> usize {
        if byte == TAB {
            self.next_tab(col)
        } else {
            col + 1
        }
    }

    /// Start of the visual line containing `pos`.
    pub fn visual_line_start(&self, buf: &GapBuffer, pos: usize) -> usize {
        let pos = pos.min(buf.len());
        if pos == 0 {
            return 0;
        }
        let mut vis_start = line_start(buf, pos);
        let mut col = 0;
        for i in vis_start..pos {
            let b = buf.char_at(i);
            if is_line_end(b) {
                vis_start = i + 1;
                col = 0;
                continue;
            }
            col = self.advance(col, b);
            if col >= self.screen_cols {
                vis_start = i + 1;
                col = 0;
            }
        }
        vis_start
    }

    /// Start of the visual line after the one containing `pos`, or `len` when
    /// `pos` is on the last visual line.
    pub fn visual_line_next(&self, buf: &GapBuffer, pos: usize) -> usize {
        let len = buf.len();
        let mut col = 0;
        let mut i = self.visual_line_start(buf, pos);
        while i < len {
            let b = buf.char_at(i);
            if is_line_end(b) {
                return i + 1;
            }
            col = self.advance(col, b);
            if col >= self.screen_cols {
                return i + 1;
            }
            i += 1;
        }
        len
    }

    /// Start of the visual line before the one containing `pos`.
    ///
    /// Scanning back to a single terminator is not enough: the preceding
    /// visual line may be a wrapped continuation of a longer logical line.
    /// We back up across two terminators (or to the buffer start) and replay
    /// the wrap simulation forward.
    pub fn visual_line_previous(&self, buf: &GapBuffer, pos: usize) -> usize {
        let pos = pos.min(buf.len());
        if pos == 0 {
            return 0;
        }
        let mut scan = pos;
        let mut terminators = 0;
        while scan > 0 && terminators < 2 {
            scan -= 1;
            if is_line_end(buf.char_at(scan)) {
                terminators += 1;
            }
        }
        if terminators > 1 && is_line_end(buf.char_at(scan)) {
            scan += 1;
        }

        let mut current = scan;
        let mut previous = scan;
        let mut col = 0;
        for i in scan..pos {
            let b = buf.char_at(i);
            let wrapped = if is_line_end(b) {
                true
            } else {
                col = self.advance(col, b);
                col >= self.screen_cols
            };
            if wrapped {
                previous = current;
                current = i + 1;
                col = 0;
            }
        }
        previous
    }

    /// Last position the cursor may occupy on the visual line starting at
    /// `start`: the terminator, the last byte of a wrapped line, or `len`.
    pub fn visual_line_end(&self, buf: &GapBuffer, start: usize) -> usize {
        let len = buf.len();
        let mut pos = start;
        let mut col = 0;
        while pos < len {
            let b = buf.char_at(pos);
            if is_line_end(b) {
                break;
            }
            col = self.advance(col, b);
            if col >= self.screen_cols {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// Position on the visual line starting at `start` closest to
    /// `target_col` without passing `limit`.
    pub fn position_at_column(
        &self,
        buf: &GapBuffer,
        start: usize,
        target_col: usize,
        limit: usize,
    ) -> usize {
        let mut pos = start;
        let mut col = 0;
        while col < target_col && pos < limit {
            col = self.advance(col, buf.char_at(pos));
            if col >= self.screen_cols {
                break;
            }
            pos += 1;
        }
        pos
    }

    /// Screen column of `pos` within its visual line.
    pub fn column_of(&self, buf: &GapBuffer, pos: usize) -> usize {
        let pos = pos.min(buf.len());
        let start = self.visual_line_start(buf, pos);
        let mut col = 0;
        for i in start..pos {
            let b = buf.char_at(i);
            if is_line_end(b) {
                col = 0;
                continue;
            }
            col = self.advance(col, b);
            if col >= self.screen_cols {
                col = 0;
            }
        }
        col
    }

    /// Row/column of `pos` counted from the visual line starting at `top`.
    /// `None` when `pos` lies above `top`.
    ///
    /// The walk stops early once `max_rows` rows have been passed, returning
    /// the row count reached so callers can detect "below the window"
    /// without walking the rest of the buffer.
    pub fn screen_offset(
        &self,
        buf: &GapBuffer,
        top: usize,
        pos: usize,
        max_rows: usize,
    ) -> Option<ScreenOffset> {
        if pos < top {
            return None;
        }
        let pos = pos.min(buf.len());
        let mut row = 0;
        let mut col = 0;
        for i in top..pos {
            let b = buf.char_at(i);
            if is_line_end(b) {
                row += 1;
                col = 0;
            } else {
                col = self.advance(col, b);
                if col >= self.screen_cols {
                    row += 1;
                    col = 0;
                }
            }
            if row > max_rows {
                break;
            }
        }
        Some(ScreenOffset { row, col })
    }

    /// Number of visual rows the logical line containing `pos` occupies from
    /// the visual line of `pos` onward (at least 1).
    ///
    /// A logical line that exactly fills its last row counts the empty row
    /// its terminator (or the end of buffer) wraps onto.
    pub fn rows_to_line_end(&self, buf: &GapBuffer, pos: usize) -> usize {
        let len = buf.len();
        let mut rows = 1;
        let mut col = 0;
        let mut i = self.visual_line_start(buf, pos);
        while i < len {
            let b = buf.char_at(i);
            if is_line_end(b) {
                break;
            }
            col = self.advance(col, b);
            if col >= self.screen_cols {
                rows += 1;
                col = 0;
            }
            i += 1;
        }
        rows
    }

    /// Visual line start `count` lines above `pos` (stops at 0).
    pub fn back_visual_lines(&self, buf: &GapBuffer, pos: usize, count: usize) -> usize {
        let mut pos = self.visual_line_start(buf, pos);
        for _ in 0..count {
            if pos == 0 {
                break;
            }
            pos = self.visual_line_previous(buf, pos);
        }
        pos
    }

    /// Visual line start `count` lines below the one containing `pos`
    /// (stops at the last visual line).
    pub fn forward_visual_lines(&self, buf: &GapBuffer, pos: usize, count: usize) -> usize {
        let mut pos = self.visual_line_start(buf, pos);
        for _ in 0..count {
            let next = self.visual_line_next(buf, pos);
            if next <= pos || (next >= buf.len() && !ends_on_boundary(self, buf, pos, next)) {
                break;
            }
            pos = next;
        }
        pos
    }
}

/// True when `next` (the result of `visual_line_next(pos)`) is a real visual
/// line start rather than the end-of-buffer sentinel.
fn ends_on_boundary(layout: &VisualLayout, buf: &GapBuffer, pos: usize, next: usize) -> bool {
    if next < buf.len() {
        return true;
    }
    // `next == len`: a real (empty) visual line exists there only if the
    // previous visual line ended with a terminator or an exact wrap.
    next > pos && layout.visual_line_start(buf, next) == next
}
