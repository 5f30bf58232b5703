//! Motion sub-dispatch: cursor movement, selection extension, paging.
//!
//! Vertical motion works on visual lines and keeps the cursor's screen
//! column, clamped to the target line. A plain arrow with an active
//! selection collapses it to its start (Left/Up) or end (Right/Down).
//! Extending motions recompute the span from the anchor; only the bytes
//! between the old and new cursor change highlight, so only that range is
//! repainted.

use super::{DispatchResult, ensure_visible, request_span_repaint};
use crate::MotionKind;
use core_state::{EditorState, RenderRequest};
use core_text::motion;

/// Destination of `kind` from the cursor.
fn target(kind: MotionKind, state: &EditorState) -> usize {
    let pos = state.cursor.pos;
    let buf = &state.buffer;
    match kind {
        MotionKind::Left => pos.saturating_sub(1),
        MotionKind::Right => (pos + 1).min(buf.len()),
        MotionKind::WordLeft => motion::word_left(buf, pos),
        MotionKind::WordRight => motion::word_right(buf, pos),
        MotionKind::Up => vertical_up(state),
        MotionKind::Down => vertical_down(state),
    }
}

fn vertical_up(state: &EditorState) -> usize {
    let layout = state.layout();
    let buf = &state.buffer;
    let pos = state.cursor.pos;
    let start = layout.visual_line_start(buf, pos);
    if start == 0 {
        return pos;
    }
    let col = layout.column_of(buf, pos);
    let prev = layout.visual_line_previous(buf, start);
    let end = layout.visual_line_end(buf, prev);
    layout.position_at_column(buf, prev, col, end)
}

fn vertical_down(state: &EditorState) -> usize {
    let layout = state.layout();
    let buf = &state.buffer;
    let pos = state.cursor.pos;
    let next = layout.visual_line_next(buf, pos);
    if next <= pos {
        return pos;
    }
    let col = layout.column_of(buf, pos);
    let end = layout.visual_line_end(buf, next);
    layout.position_at_column(buf, next, col, end)
}

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    if let Some(span) = state.selection.span() {
        let collapse_to = match kind {
            MotionKind::Left | MotionKind::Up => Some(span.start),
            MotionKind::Right | MotionKind::Down => Some(span.end),
            MotionKind::WordLeft | MotionKind::WordRight => None,
        };
        if let Some(pos) = collapse_to {
            state.selection.clear();
            request_span_repaint(state, span.start, span.end);
            state.set_cursor(pos);
            ensure_visible(state);
            state.request(RenderRequest::CursorOnly);
            return DispatchResult::handled();
        }
        // Word motion leaves the highlight behind; drop it.
        state.selection.clear();
        request_span_repaint(state, span.start, span.end);
    }
    let to = target(kind, state);
    tracing::trace!(target: "actions.motion", ?kind, from = state.cursor.pos, to, "move");
    state.set_cursor(to);
    state.request(RenderRequest::CursorOnly);
    DispatchResult::handled()
}

pub(crate) fn handle_extend(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    let from = state.cursor.pos;
    state.selection.begin(from);
    let to = target(kind, state);
    state.set_cursor(to);
    let change = state.selection.extend_to(to);
    tracing::trace!(target: "state.selection", ?kind, from, to, ?change, "extend");
    request_span_repaint(state, from, to);
    state.request(RenderRequest::CursorOnly);
    DispatchResult::handled()
}

pub(crate) fn select_all(state: &mut EditorState) -> DispatchResult {
    let len = state.len();
    state.selection.select(0, 0, len);
    state.set_cursor(len);
    state.set_status("All text selected");
    state.request(RenderRequest::Full);
    DispatchResult::handled()
}

/// Esc outside prompts.
pub(crate) fn clear_selection(state: &mut EditorState) -> DispatchResult {
    let Some(span) = state.selection.span() else {
        state.selection.clear();
        return DispatchResult::handled();
    };
    state.selection.clear();
    request_span_repaint(state, span.start, span.end);
    state.set_status("Selection cleared");
    DispatchResult::handled()
}

/// Put the cursor on the visual line `row` lines below `top`, column 0.
/// Leaves the cursor alone when it was not inside the window.
fn keep_relative_row(state: &mut EditorState, row: isize) {
    if row < 0 || row as usize >= state.view.eff_rows() {
        return;
    }
    let layout = state.layout();
    let buf = &state.buffer;
    let len = buf.len();
    let mut pos = state.view.top;
    for _ in 0..row {
        if pos >= len {
            break;
        }
        let next = layout.visual_line_next(buf, pos);
        if next <= pos {
            break;
        }
        pos = next;
    }
    state.set_cursor(pos.min(len));
}

pub(crate) fn page_up(state: &mut EditorState) -> DispatchResult {
    state.sync_cursor_screen();
    let row = state.cursor.row;
    let layout = state.layout();
    let original = state.view.top;
    let mut top = original;
    for _ in 0..state.view.eff_rows() {
        if top == 0 {
            break;
        }
        let prev = layout.visual_line_previous(&state.buffer, top);
        if prev >= top {
            break;
        }
        top = prev;
    }

    state.selection.clear();
    state.request(RenderRequest::Full);
    if top == 0 && original == 0 {
        state.set_cursor(0);
        return DispatchResult::handled();
    }
    tracing::debug!(target: "actions.motion", from = original, to = top, "page_up");
    state.view.top = top;
    keep_relative_row(state, row);
    DispatchResult::handled()
}

pub(crate) fn page_down(state: &mut EditorState) -> DispatchResult {
    state.sync_cursor_screen();
    let row = state.cursor.row;
    let layout = state.layout();
    let buf = &state.buffer;
    let len = buf.len();
    let max_top = if len > 0 {
        motion::line_start(buf, len - 1)
    } else {
        0
    };
    let original = state.view.top;
    let mut top = original;
    for _ in 0..state.view.eff_rows() {
        if top >= len {
            break;
        }
        let next = layout.visual_line_next(buf, top);
        if next <= top || next > max_top {
            break;
        }
        top = next;
    }

    tracing::debug!(target: "actions.motion", from = original, to = top, "page_down");
    state.view.top = top;
    state.selection.clear();
    state.request(RenderRequest::Full);
    keep_relative_row(state, row);
    DispatchResult::handled()
}
