//! Render scheduler.
//!
//! Edit and motion handlers record a [`RenderRequest`] on the editor state
//! (merged per keystroke, see `core_state::render_request`). Once per loop
//! turn the scheduler consumes it exactly once and produces a [`Decision`]:
//!
//! - `semantic`: what the handlers asked for.
//! - `effective`: what the engine should execute now. Differs from
//!   `semantic` when the cursor left the window (the window scrolls and the
//!   frame escalates to `Full`) or when a partial path's start position sits
//!   above the window.
//!
//! Scrolling moves `view.top` by whole visual lines: a cursor below the
//! window lands on its last row, a cursor above lands on its first row.
//!
//! Before anything else `view.top` is snapped back onto a visual line start.
//! Bulk edits can leave it past the end of text, and deleting a byte just
//! above it can unwrap its row so it points mid-line. Snapping moves the
//! window, so it escalates to `Full` like a scroll.

use core_state::{EditorState, RenderRequest};
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderRequest,
    pub effective: RenderRequest,
    pub status: bool,
    pub title: bool,
    pub scrolled: bool,
}

/// Counts of semantic requests per update class.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    full: AtomicU64,
    char_from: AtomicU64,
    down_from: AtomicU64,
    minimal_from: AtomicU64,
    cursor_only: AtomicU64,
    scroll_escalations: AtomicU64,
    above_top_escalations: AtomicU64,
    top_realignments: AtomicU64,
    frames: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestMetricsSnapshot {
    pub full: u64,
    pub char_from: u64,
    pub down_from: u64,
    pub minimal_from: u64,
    pub cursor_only: u64,
    pub scroll_escalations: u64,
    pub above_top_escalations: u64,
    pub top_realignments: u64,
    pub frames: u64,
}

impl RequestMetrics {
    pub fn snapshot(&self) -> RequestMetricsSnapshot {
        RequestMetricsSnapshot {
            full: self.full.load(Relaxed),
            char_from: self.char_from.load(Relaxed),
            down_from: self.down_from.load(Relaxed),
            minimal_from: self.minimal_from.load(Relaxed),
            cursor_only: self.cursor_only.load(Relaxed),
            scroll_escalations: self.scroll_escalations.load(Relaxed),
            above_top_escalations: self.above_top_escalations.load(Relaxed),
            top_realignments: self.top_realignments.load(Relaxed),
            frames: self.frames.load(Relaxed),
        }
    }

    fn incr_semantic(&self, req: &RenderRequest) {
        let counter = match req {
            RenderRequest::Full => &self.full,
            RenderRequest::CharFrom(_) => &self.char_from,
            RenderRequest::DownFrom(_) => &self.down_from,
            RenderRequest::MinimalFrom(_) => &self.minimal_from,
            RenderRequest::CursorOnly => &self.cursor_only,
        };
        counter.fetch_add(1, Relaxed);
        self.frames.fetch_add(1, Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    metrics: RequestMetrics,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics_snapshot(&self) -> RequestMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Drain the pending request, bring the cursor into view and decide the
    /// effective path. `None` when nothing was requested.
    pub fn consume(&mut self, state: &mut EditorState) -> Option<Decision> {
        let frame = state.render.take()?;
        self.metrics.incr_semantic(&frame.request);
        let realigned = realign_top(state);
        if realigned {
            self.metrics.top_realignments.fetch_add(1, Relaxed);
        }
        state.sync_cursor_screen();
        let scrolled = scroll_into_view(state) || realigned;
        let effective = if scrolled {
            self.metrics.scroll_escalations.fetch_add(1, Relaxed);
            RenderRequest::Full
        } else {
            match frame.request.position() {
                Some(pos) if pos < state.view.top => {
                    self.metrics.above_top_escalations.fetch_add(1, Relaxed);
                    RenderRequest::Full
                }
                _ => frame.request,
            }
        };
        tracing::trace!(
            target: "render.scheduler",
            semantic = ?frame.request,
            ?effective,
            scrolled,
            "render_decision"
        );
        Some(Decision {
            semantic: frame.request,
            effective,
            status: frame.status,
            title: frame.title,
            scrolled,
        })
    }
}

/// Snap `view.top` to the start of the visual line holding it, clamped to
/// the end of text. Returns whether it moved.
pub fn realign_top(state: &mut EditorState) -> bool {
    let old_top = state.view.top;
    let top = old_top.min(state.len());
    let new_top = state.layout().visual_line_start(&state.buffer, top);
    if new_top == old_top {
        return false;
    }
    state.view.top = new_top;
    tracing::debug!(target: "render.scheduler", old_top, new_top, "realign_top");
    true
}

/// Move `view.top` so the cursor row lies inside the window. Returns whether
/// the window moved.
pub fn scroll_into_view(state: &mut EditorState) -> bool {
    let eff = state.view.eff_rows();
    let row = state.cursor.row;
    let layout = state.layout();
    let new_top = if row < 0 {
        layout.visual_line_start(&state.buffer, state.cursor.pos)
    } else if row as usize >= eff {
        layout.back_visual_lines(&state.buffer, state.cursor.pos, eff - 1)
    } else {
        return false;
    };
    let old_top = state.view.top;
    state.view.top = new_top;
    state.sync_cursor_screen();
    tracing::debug!(target: "render.scheduler", old_top, new_top, "scroll");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::ViewState;
    use core_text::GapBuffer;

    fn state(text: &str, cols: usize, rows: usize) -> EditorState {
        let buf = GapBuffer::from_bytes(text.as_bytes(), 256).unwrap();
        EditorState::new(buf, ViewState::new(cols, rows, 4), 8)
    }

    #[test]
    fn nothing_pending_yields_none() {
        let mut s = state("abc", 20, 8);
        let mut sched = RenderScheduler::new();
        assert!(sched.consume(&mut s).is_none());
    }

    #[test]
    fn passes_through_partial_request() {
        let mut s = state("abc", 20, 8);
        s.set_cursor(2);
        s.request(RenderRequest::CharFrom(1));
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert_eq!(d.effective, RenderRequest::CharFrom(1));
        assert!(!d.scrolled);
        assert_eq!(sched.metrics_snapshot().char_from, 1);
    }

    #[test]
    fn cursor_below_window_scrolls_to_last_row() {
        // 8 rows -> status row 6 -> 5 text rows.
        let text = "0\n1\n2\n3\n4\n5\n6\n7";
        let mut s = state(text, 20, 8);
        s.set_cursor(14); // line 7
        s.request(RenderRequest::CursorOnly);
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert!(d.scrolled);
        assert_eq!(d.semantic, RenderRequest::CursorOnly);
        assert_eq!(d.effective, RenderRequest::Full);
        assert_eq!(s.view.top, 6); // line 3
        assert_eq!(s.cursor.row, 4);
    }

    #[test]
    fn cursor_above_window_scrolls_to_first_row() {
        let text = "0\n1\n2\n3\n4\n5\n6\n7";
        let mut s = state(text, 20, 8);
        s.view.top = 8;
        s.set_cursor(2);
        s.request(RenderRequest::CursorOnly);
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert!(d.scrolled);
        assert_eq!(s.view.top, 2);
        assert_eq!(s.cursor.row, 0);
    }

    #[test]
    fn stale_top_past_end_snaps_and_repaints() {
        // Everything was replaced by "aa" while the window sat further down.
        let mut s = state("aa", 20, 8);
        s.view.top = 5;
        s.set_cursor(2);
        s.request(RenderRequest::CharFrom(1));
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert_eq!(s.view.top, 0);
        assert_eq!(d.effective, RenderRequest::Full);
        assert!(d.scrolled);
        assert_eq!(s.cursor.row, 0);
        assert_eq!(sched.metrics_snapshot().top_realignments, 1);
    }

    #[test]
    fn unwrapped_top_snaps_to_line_start() {
        // 4 columns: "ab\tc" wrapped at the tab, top on the "c" row. Dropping
        // the tab unwraps the line so offset 3 now sits mid-row.
        let mut s = state("ab\tcd", 4, 8);
        s.view.top = 3;
        s.set_cursor(3);
        s.delete_back();
        assert_eq!(s.buffer.to_vec(), b"abcd");
        s.request(RenderRequest::CharFrom(2));
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert_eq!(s.view.top, 0);
        assert_eq!(d.effective, RenderRequest::Full);
    }

    #[test]
    fn aligned_top_is_left_alone() {
        let mut s = state("abcdefgh", 4, 8);
        s.view.top = 4;
        s.set_cursor(5);
        s.request(RenderRequest::CursorOnly);
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert_eq!(s.view.top, 4);
        assert_eq!(d.effective, RenderRequest::CursorOnly);
        assert_eq!(sched.metrics_snapshot().top_realignments, 0);
    }

    #[test]
    fn start_above_top_escalates() {
        let text = "0\n1\n2\n3";
        let mut s = state(text, 20, 8);
        s.view.top = 2;
        s.set_cursor(2);
        s.request(RenderRequest::MinimalFrom(1));
        let mut sched = RenderScheduler::new();
        let d = sched.consume(&mut s).unwrap();
        assert_eq!(d.effective, RenderRequest::Full);
        assert_eq!(sched.metrics_snapshot().above_top_escalations, 1);
    }
}
