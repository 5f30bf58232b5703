//! Editor state: the single owned aggregate mutated by the main loop.
//!
//! `EditorState` bundles the gap buffer with everything derived from it:
//! cursor (position, cached screen row/column, cached logical line), the
//! selection, the bounded undo log, view geometry, the status message slot,
//! prompt state for the modal controllers and the pending render request.
//!
//! Mutation primitives that must keep several views consistent live here
//! (`insert_byte`, `delete_back`, `delete_forward`, `delete_selection`,
//! `undo`). Policy (which render class to request, which status to show)
//! belongs to the dispatcher in `core-actions`.
//!
//! Cached line number: `cursor.line` always equals the number of
//! terminators strictly before `cursor.pos`. Single-step moves update it
//! incrementally; bulk operations (selection delete, paste, undo, load)
//! recount with [`EditorState::recount_lines`].

use core_text::motion::{count_lines, count_terminators};
use core_text::{BufferError, CR, GapBuffer, LF, VisualLayout, is_line_end};
use std::path::PathBuf;
use tracing::{debug, trace};

pub mod clipboard;
pub mod render_request;
pub mod selection;
pub mod undo;

pub use clipboard::{BlockClipboard, CLIPBOARD_SIZE, ClipboardError, ClipboardService};
pub use render_request::{PendingFrame, PendingRender, RenderRequest};
pub use selection::{Selection, SelectionChange, SelectionSpan};
pub use undo::{MAX_UNDO, UndoAction, UndoEntry, UndoLog};

/// File name shown when none was given on the command line.
pub const DEFAULT_FILE_NAME: &str = "untitled.txt";
/// Longest search needle accepted by the prompt.
pub const MAX_SEARCH: usize = 31;
/// Longest goto-line input accepted by the prompt.
pub const MAX_GOTO_DIGITS: usize = 7;

/// Interaction state derived from the prompt and the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Selecting,
    Searching,
    FindReady,
    GotoPrompt,
    Help,
}

/// Modal controller currently intercepting keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Prompt {
    #[default]
    None,
    /// Collecting a search needle.
    Search(String),
    /// Last search matched; Ctrl+F repeats it.
    FindReady,
    /// Collecting goto-line digits.
    Goto(String),
    Help,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    pub pos: usize,
    /// Screen column on the cursor's visual line.
    pub col: usize,
    /// Visual row relative to `view.top`; negative or `>= eff_rows` until
    /// the renderer scrolls.
    pub row: isize,
    /// 0-based logical line of `pos`.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// Logical offset of the first visible visual line.
    pub top: usize,
    pub screen_cols: usize,
    pub screen_rows: usize,
    pub tab_width: usize,
    pub double_spacing: bool,
}

impl ViewState {
    /// First physical row of the text window (row 0 is the title bar).
    pub const TEXT_START_ROW: usize = 1;

    pub fn new(screen_cols: usize, screen_rows: usize, tab_width: usize) -> Self {
        Self {
            top: 0,
            screen_cols: screen_cols.max(1),
            screen_rows: screen_rows.max(4),
            tab_width: tab_width.max(1),
            double_spacing: false,
        }
    }

    pub fn layout(&self) -> VisualLayout {
        VisualLayout::new(self.screen_cols, self.tab_width)
    }

    pub fn status_row(&self) -> usize {
        self.screen_rows - 2
    }

    pub fn help_row(&self) -> usize {
        self.screen_rows - 1
    }

    /// Number of visual lines that fit in the text window.
    pub fn eff_rows(&self) -> usize {
        let rows = self.status_row() - Self::TEXT_START_ROW;
        let rows = if self.double_spacing { rows / 2 } else { rows };
        rows.max(1)
    }

    /// Physical row for visual row `row` of the window.
    pub fn phys_row(&self, row: usize) -> usize {
        let stride = if self.double_spacing { 2 } else { 1 };
        Self::TEXT_START_ROW + row * stride
    }

    pub fn row_stride(&self) -> usize {
        if self.double_spacing { 2 } else { 1 }
    }
}

/// Single status message slot, shown on the next status line repaint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSlot {
    message: Option<String>,
}

impl StatusSlot {
    pub fn set(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn peek(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn take(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

#[derive(Debug)]
pub struct EditorState {
    pub buffer: GapBuffer,
    pub cursor: CursorState,
    pub selection: Selection,
    pub undo: UndoLog,
    pub view: ViewState,
    pub status: StatusSlot,
    pub prompt: Prompt,
    /// Needle of the last executed search.
    pub last_search: String,
    pub file_name: PathBuf,
    pub dirty: bool,
    pub total_lines: usize,
    /// First Ctrl+Q on a dirty buffer arms this; any other key disarms it.
    pub quit_confirm: bool,
    /// Terminator inserted by Enter; Shift+Enter inserts the other one.
    pub enter_terminator: u8,
    pub render: PendingRender,
}

impl EditorState {
    pub fn new(buffer: GapBuffer, view: ViewState, undo_depth: usize) -> Self {
        let total_lines = count_lines(&buffer);
        Self {
            buffer,
            cursor: CursorState::default(),
            selection: Selection::default(),
            undo: UndoLog::new(undo_depth),
            view,
            status: StatusSlot::default(),
            prompt: Prompt::None,
            last_search: String::new(),
            file_name: PathBuf::from(DEFAULT_FILE_NAME),
            dirty: false,
            total_lines,
            quit_confirm: false,
            enter_terminator: CR,
            render: PendingRender::default(),
        }
    }

    pub fn layout(&self) -> VisualLayout {
        self.view.layout()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn mode(&self) -> Mode {
        match self.prompt {
            Prompt::Search(_) => Mode::Searching,
            Prompt::FindReady => Mode::FindReady,
            Prompt::Goto(_) => Mode::GotoPrompt,
            Prompt::Help => Mode::Help,
            Prompt::None if self.selection.is_active() => Mode::Selecting,
            Prompt::None => Mode::Normal,
        }
    }

    /// Terminator inserted by Shift+Enter.
    pub fn alternate_terminator(&self) -> u8 {
        if self.enter_terminator == CR { LF } else { CR }
    }

    pub fn request(&mut self, req: RenderRequest) {
        self.render.request(req);
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status.set(msg);
        self.render.mark_status();
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        if self.dirty != dirty {
            self.dirty = dirty;
            self.render.mark_title();
        }
    }

    /// Move the cursor, keeping the cached line number in step by counting
    /// the terminators crossed.
    pub fn set_cursor(&mut self, pos: usize) {
        let pos = pos.min(self.buffer.len());
        let old = self.cursor.pos;
        if pos > old {
            self.cursor.line += count_terminators(&self.buffer, old, pos);
        } else if pos < old {
            self.cursor.line -= count_terminators(&self.buffer, pos, old);
        }
        self.cursor.pos = pos;
    }

    /// Full rescan of the total line count and the cursor line cache.
    pub fn recount_lines(&mut self) {
        self.total_lines = count_lines(&self.buffer);
        self.cursor.line = count_terminators(&self.buffer, 0, self.cursor.pos);
    }

    /// Insert at the cursor, recording an undo entry first.
    pub fn insert_byte(&mut self, byte: u8) -> Result<(), BufferError> {
        if self.buffer.is_full() {
            return Err(BufferError::Full {
                capacity: self.buffer.capacity(),
            });
        }
        let pos = self.cursor.pos;
        self.undo.push(UndoEntry::insert(pos, byte));
        self.buffer.insert_at(pos, byte)?;
        self.cursor.pos = pos + 1;
        if is_line_end(byte) {
            self.cursor.line += 1;
            self.total_lines += 1;
        }
        self.set_dirty(true);
        Ok(())
    }

    /// Remove the byte before the cursor, recording an undo entry first.
    pub fn delete_back(&mut self) -> Option<u8> {
        let pos = self.cursor.pos;
        if pos == 0 {
            return None;
        }
        let byte = self.buffer.char_at(pos - 1);
        self.undo.push(UndoEntry::delete(pos - 1, byte));
        self.buffer.delete_before(pos)?;
        self.cursor.pos = pos - 1;
        if is_line_end(byte) {
            self.cursor.line -= 1;
            self.total_lines -= 1;
        }
        self.set_dirty(true);
        Some(byte)
    }

    /// Remove the byte under the cursor, recording an undo entry first.
    pub fn delete_forward(&mut self) -> Option<u8> {
        let pos = self.cursor.pos;
        if pos >= self.buffer.len() {
            return None;
        }
        let byte = self.buffer.char_at(pos);
        self.undo.push(UndoEntry::delete(pos, byte));
        self.buffer.delete_before(pos + 1)?;
        if is_line_end(byte) {
            self.total_lines -= 1;
        }
        self.set_dirty(true);
        Some(byte)
    }

    /// Delete the selected range, one undo entry per byte from the last
    /// byte back to the first so undo restores them front to back. The
    /// cursor lands on the range start. Returns the deleted span.
    pub fn delete_selection(&mut self) -> Option<SelectionSpan> {
        let span = self.selection.span()?;
        let end = span.end.min(self.buffer.len());
        for pos in (span.start..end).rev() {
            let byte = self.buffer.char_at(pos);
            self.undo.push(UndoEntry::delete(pos, byte));
        }
        // Move first so the line cache counts terminators in the old text.
        self.set_cursor(span.start);
        self.buffer.delete_range(span.start, end);
        self.selection.clear();
        self.total_lines = count_lines(&self.buffer);
        self.set_dirty(true);
        debug!(target: "state.selection", start = span.start, end, "selection_deleted");
        Some(span)
    }

    /// Selected bytes as the two slices around the gap.
    pub fn selection_segments(&self) -> Option<(&[u8], &[u8])> {
        let span = self.selection.span()?;
        Some(self.buffer.range_segments(span.start, span.end))
    }

    /// Apply the inverse of the newest undo entry without recording a new
    /// entry, then drop it from the log. Leaves the cursor just after the
    /// restored byte (or at the removed one) and rescans line counts.
    ///
    /// Re-inserting a deleted byte into a full buffer fails with
    /// [`BufferError::Full`]; the entry stays on the log and nothing changes.
    pub fn undo(&mut self) -> Result<Option<UndoEntry>, BufferError> {
        let Some(entry) = self.undo.last() else {
            return Ok(None);
        };
        match entry.action {
            UndoAction::Insert => {
                self.buffer.delete_before(entry.pos + 1);
                self.cursor.pos = entry.pos.min(self.buffer.len());
            }
            UndoAction::Delete => {
                let at = entry.pos.min(self.buffer.len());
                if let Err(e) = self.buffer.insert_at(at, entry.byte) {
                    debug!(target: "state.undo", pos = entry.pos, "undo_rejected_full");
                    return Err(e);
                }
                self.cursor.pos = (at + 1).min(self.buffer.len());
            }
        }
        self.undo.pop();
        self.selection.clear();
        self.recount_lines();
        self.set_dirty(true);
        trace!(target: "state.undo", pos = entry.pos, action = ?entry.action, "undo_applied");
        Ok(Some(entry))
    }

    /// Replace the buffer contents (file load). Resets cursor, view, undo
    /// and selection.
    pub fn replace_text(&mut self, bytes: &[u8]) -> usize {
        self.buffer.clear();
        let take = bytes.len().min(self.buffer.capacity().saturating_sub(1));
        for (i, &b) in bytes[..take].iter().enumerate() {
            if self.buffer.insert_at(i, b).is_err() {
                break;
            }
        }
        self.cursor = CursorState::default();
        self.view.top = 0;
        self.selection.clear();
        self.undo.clear();
        self.recount_lines();
        self.render.request(RenderRequest::Full);
        self.buffer.len()
    }

    /// Visual row (relative to `view.top`) and column of `pos`.
    ///
    /// Rows above the window are negative. The downward walk is capped just
    /// past the window so an off-screen cursor does not scan the rest of the
    /// buffer.
    pub fn screen_position(&self, pos: usize) -> (isize, usize) {
        let layout = self.layout();
        let eff = self.view.eff_rows();
        match layout.screen_offset(&self.buffer, self.view.top, pos, eff) {
            Some(off) if off.row <= eff => (off.row as isize, off.col),
            Some(off) => (off.row as isize, layout.column_of(&self.buffer, pos)),
            None => {
                let mut row = 0isize;
                let mut line = layout.visual_line_start(&self.buffer, pos);
                while line < self.view.top {
                    let next = layout.visual_line_next(&self.buffer, line);
                    if next <= line {
                        break;
                    }
                    line = next;
                    row -= 1;
                }
                (row, layout.column_of(&self.buffer, pos))
            }
        }
    }

    /// Recompute `cursor.row`/`cursor.col` from `view.top`.
    pub fn sync_cursor_screen(&mut self) {
        let (row, col) = self.screen_position(self.cursor.pos);
        self.cursor.row = row;
        self.cursor.col = col;
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor.row >= 0 && (self.cursor.row as usize) < self.view.eff_rows()
    }
}
