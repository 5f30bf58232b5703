//! RenderEngine: executes one scheduler [`Decision`] against an output sink.
//!
//! Paths, by effective request:
//! - `Full`: title bar, the whole text window from `view.top`, status line.
//! - `CharFrom(p)`: plain text from `p` to the end of its logical line,
//!   located relative to the cursor. No selection attributes.
//! - `MinimalFrom(p)`: selection-aware redraw from `p` to the end of its
//!   logical line.
//! - `DownFrom(p)`: selection-aware redraw from `p` to the bottom of the
//!   window, erasing rows left over after the end of text.
//! - `CursorOnly`: nothing but the status line and cursor.
//!
//! Every frame is bracketed by HideCursor/ShowCursor and ends with the
//! cursor placed at its cached screen position. While the help overlay is
//! up, frames other than the one that draws it are dropped.

use crate::batch_writer::BatchWriter;
use crate::help::help_lines;
use crate::partial_metrics::{RenderPathMetrics, RenderPathMetricsSnapshot};
use crate::scheduler::Decision;
use crate::status::{StatusCache, StatusPaint};
use crate::title::{display_name, title_line};
use anyhow::Result;
use core_state::{EditorState, Mode, RenderRequest, ViewState};
use core_terminal::{OutputSink, TermCommand};
use core_text::motion::line_end;
use core_text::{TAB, is_line_end, is_printable};
use tracing::debug_span;

/// Where a text draw stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    LineEnd,
    ScreenEnd,
}

/// Byte shown for control characters.
const CONTROL_GLYPH: u8 = b'?';

#[derive(Debug, Default)]
pub struct RenderEngine {
    in_progress: bool,
    help_drawn: bool,
    status: StatusCache,
    metrics: RenderPathMetrics,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RenderPathMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn help_visible(&self) -> bool {
        self.help_drawn
    }

    pub fn render(
        &mut self,
        state: &mut EditorState,
        decision: &Decision,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        if self.in_progress {
            RenderPathMetrics::bump(&self.metrics.reentrant_skips);
            return Ok(());
        }
        self.in_progress = true;
        let result = self.render_frame(state, decision, sink);
        self.in_progress = false;
        result
    }

    fn render_frame(
        &mut self,
        state: &mut EditorState,
        decision: &Decision,
        sink: &mut dyn OutputSink,
    ) -> Result<()> {
        let span = debug_span!(
            target: "render.engine",
            "render_cycle",
            effective = ?decision.effective,
            top = state.view.top
        );
        let _e = span.enter();

        if state.mode() == Mode::Help {
            if self.help_drawn {
                return Ok(());
            }
            let mut w = BatchWriter::new(sink);
            draw_help(&mut w, state)?;
            self.finish(w)?;
            self.help_drawn = true;
            RenderPathMetrics::bump(&self.metrics.help_frames);
            return Ok(());
        }

        // Leaving the overlay always repaints everything.
        let effective = if self.help_drawn {
            self.help_drawn = false;
            RenderRequest::Full
        } else {
            decision.effective
        };

        let mut w = BatchWriter::new(sink);
        w.command(TermCommand::HideCursor)?;
        let full = match effective {
            RenderRequest::Full => true,
            RenderRequest::CharFrom(pos) => {
                match locate_near_cursor(state, pos) {
                    Some((row, col)) => {
                        draw_range(&mut w, state, pos, Stop::LineEnd, row, col, false)?;
                        RenderPathMetrics::bump(&self.metrics.char_frames);
                        false
                    }
                    None => self.degrade(),
                }
            }
            RenderRequest::MinimalFrom(pos) => match locate(state, pos) {
                Some((row, col)) => {
                    draw_range(&mut w, state, pos, Stop::LineEnd, row, col, true)?;
                    RenderPathMetrics::bump(&self.metrics.minimal_frames);
                    false
                }
                None => self.degrade(),
            },
            RenderRequest::DownFrom(pos) => match locate(state, pos) {
                Some((row, col)) => {
                    draw_range(&mut w, state, pos, Stop::ScreenEnd, row, col, true)?;
                    RenderPathMetrics::bump(&self.metrics.down_frames);
                    false
                }
                None => self.degrade(),
            },
            RenderRequest::CursorOnly => {
                RenderPathMetrics::bump(&self.metrics.cursor_frames);
                false
            }
        };

        if full {
            self.draw_title(&mut w, state)?;
            draw_range(&mut w, state, state.view.top, Stop::ScreenEnd, 0, 0, true)?;
            RenderPathMetrics::bump(&self.metrics.full_frames);
        } else if decision.title {
            self.draw_title(&mut w, state)?;
        }

        match self.status.draw(&mut w, state, full)? {
            StatusPaint::Full => RenderPathMetrics::bump(&self.metrics.status_full),
            StatusPaint::RightOnly => RenderPathMetrics::bump(&self.metrics.status_right_only),
        }

        place_cursor(&mut w, state)?;
        w.command(TermCommand::ShowCursor)?;
        self.finish(w)
    }

    fn degrade(&self) -> bool {
        RenderPathMetrics::bump(&self.metrics.degraded_full);
        true
    }

    fn finish(&self, w: BatchWriter<'_>) -> Result<()> {
        let (cmds, cells) = w.finish()?;
        self.metrics.add_batch(cmds, cells);
        Ok(())
    }

    fn draw_title(&self, w: &mut BatchWriter<'_>, state: &EditorState) -> Result<()> {
        let name = display_name(&state.file_name);
        w.move_to(0, 0)?;
        w.text(&title_line(&name, state.dirty, state.view.screen_cols));
        RenderPathMetrics::bump(&self.metrics.title_draws);
        Ok(())
    }
}

fn place_cursor(w: &mut BatchWriter<'_>, state: &EditorState) -> Result<()> {
    if !state.cursor_visible() {
        return Ok(());
    }
    let row = state.view.phys_row(state.cursor.row as usize);
    w.move_to(state.cursor.col, row)
}

fn draw_help(w: &mut BatchWriter<'_>, state: &EditorState) -> Result<()> {
    let cols = state.view.screen_cols;
    let rows = state.view.screen_rows;
    w.command(TermCommand::HideCursor)?;
    w.command(TermCommand::ClearScreen)?;
    w.command(TermCommand::Home)?;
    for (row, line) in help_lines(rows).iter().enumerate().take(rows) {
        if line.text.is_empty() {
            continue;
        }
        w.move_to(0, row)?;
        if line.reverse {
            w.command(TermCommand::ReverseOn)?;
        }
        w.text(&line.text.as_bytes()[..line.text.len().min(cols)]);
        if line.reverse {
            w.command(TermCommand::ReverseOff)?;
        }
    }
    Ok(())
}

/// Visual row and column of `pos` relative to `view.top`, if it is inside
/// the window.
pub fn locate(state: &EditorState, pos: usize) -> Option<(usize, usize)> {
    let eff = state.view.eff_rows();
    let off = state
        .layout()
        .screen_offset(&state.buffer, state.view.top, pos, eff)?;
    (off.row < eff).then_some((off.row, off.col))
}

/// Like [`locate`], but derives the row from the cached cursor row when
/// `pos` sits on the cursor's visual line or the one before it.
pub fn locate_near_cursor(state: &EditorState, pos: usize) -> Option<(usize, usize)> {
    let layout = state.layout();
    let buf = &state.buffer;
    if state.cursor_visible() && pos <= state.cursor.pos {
        let row = state.cursor.row as usize;
        let start = layout.visual_line_start(buf, state.cursor.pos);
        if pos >= start {
            return Some((row, layout.column_of(buf, pos)));
        }
        if row > 0 {
            let prev = layout.visual_line_previous(buf, start);
            if pos >= prev {
                return Some((row - 1, layout.column_of(buf, pos)));
            }
        }
    }
    locate(state, pos)
}

/// Erase every physical row below visual row `last` down to the status
/// row, spacer rows included. `last` is clamped to the window so a draw
/// that ran off the bottom still clears the trailing spacer in
/// double-spacing mode.
fn erase_below(w: &mut BatchWriter<'_>, view: &ViewState, last: usize) -> Result<()> {
    let last = last.min(view.eff_rows().saturating_sub(1));
    for row in view.phys_row(last) + 1..view.status_row() {
        w.move_to(0, row)?;
        w.command(TermCommand::EraseLine)?;
    }
    Ok(())
}

/// Draw buffer text starting at `from`, which sits at visual row `row`,
/// column `col` of the window.
///
/// Runs of bytes are batched; selection boundaries toggle reverse video
/// when `highlight` is set. Each terminator clears the rest of its row.
/// Spacer rows are blanked in double-spacing mode. Reaching the end of the
/// buffer, or drawing to the bottom of the window, erases the rows below so
/// shrinking text leaves no residue.
///
/// A line that exactly fills its last row still moves on to the row its
/// terminator wraps onto and clears it, matching the layout.
pub fn draw_range(
    w: &mut BatchWriter<'_>,
    state: &EditorState,
    from: usize,
    stop: Stop,
    mut row: usize,
    mut col: usize,
    highlight: bool,
) -> Result<()> {
    let view = &state.view;
    let buf = &state.buffer;
    let layout = state.layout();
    let cols = view.screen_cols;
    let eff = view.eff_rows();
    let len = buf.len();
    let selection = if highlight {
        state.selection.span()
    } else {
        None
    };

    if row >= eff {
        return Ok(());
    }
    let stop_pos = match stop {
        Stop::LineEnd => line_end(buf, from.min(len)),
        Stop::ScreenEnd => len,
    };

    w.move_to(col, view.phys_row(row))?;
    let mut reverse = false;
    let mut i = from;
    // Advance to the next visual row; false once the window is exhausted.
    let next_row = |w: &mut BatchWriter<'_>, row: &mut usize| -> Result<bool> {
        let old_phys = view.phys_row(*row);
        *row += 1;
        if *row >= eff {
            return Ok(false);
        }
        let new_phys = view.phys_row(*row);
        for spacer in old_phys + 1..new_phys {
            w.move_to(0, spacer)?;
            w.command(TermCommand::EraseLine)?;
        }
        w.move_to(0, new_phys)?;
        Ok(true)
    };

    while i < stop_pos {
        let selected = selection.is_some_and(|s| s.contains(i));
        if selected != reverse {
            w.command(if selected {
                TermCommand::ReverseOn
            } else {
                TermCommand::ReverseOff
            })?;
            reverse = selected;
        }

        let b = buf.char_at(i);
        i += 1;
        if is_line_end(b) {
            if reverse {
                w.command(TermCommand::ReverseOff)?;
                reverse = false;
            }
            if col < cols {
                w.command(TermCommand::ClearEol)?;
            }
            if !next_row(w, &mut row)? {
                break;
            }
            col = 0;
            continue;
        }

        if b == TAB {
            let target = layout.next_tab(col).min(cols);
            w.spaces(target - col);
            col = target;
        } else {
            w.byte(if is_printable(b) { b } else { CONTROL_GLYPH });
            col += 1;
        }

        if col >= cols {
            if !next_row(w, &mut row)? {
                break;
            }
            col = 0;
        }
    }

    if reverse {
        w.command(TermCommand::ReverseOff)?;
    }
    if row < eff && col < cols {
        w.command(TermCommand::ClearEol)?;
    }
    if i >= len || stop == Stop::ScreenEnd {
        erase_below(w, view, row)?;
    }
    Ok(())
}
