//! Render path metrics.
//!
//! Distinct from `RequestMetrics` (scheduler), which counts what the editor
//! asked for. This struct records what the engine actually executed, plus
//! batching counters, so tests can correlate intent with work done.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    pub full_frames: AtomicU64,
    pub char_frames: AtomicU64,
    pub down_frames: AtomicU64,
    pub minimal_frames: AtomicU64,
    /// Frames that only repositioned the cursor (plus status/title work).
    pub cursor_frames: AtomicU64,
    pub help_frames: AtomicU64,
    /// Status repaints that cleared and rewrote the whole line.
    pub status_full: AtomicU64,
    /// Status repaints that only rewrote the right-hand segment.
    pub status_right_only: AtomicU64,
    pub title_draws: AtomicU64,
    /// Partial paths whose start position could not be placed on screen.
    pub degraded_full: AtomicU64,
    /// Render calls skipped because a render was already running.
    pub reentrant_skips: AtomicU64,
    /// `Text` commands emitted after batching.
    pub text_commands: AtomicU64,
    /// Bytes written inside `Text` commands.
    pub cells_printed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPathMetricsSnapshot {
    pub full_frames: u64,
    pub char_frames: u64,
    pub down_frames: u64,
    pub minimal_frames: u64,
    pub cursor_frames: u64,
    pub help_frames: u64,
    pub status_full: u64,
    pub status_right_only: u64,
    pub title_draws: u64,
    pub degraded_full: u64,
    pub reentrant_skips: u64,
    pub text_commands: u64,
    pub cells_printed: u64,
}

impl RenderPathMetrics {
    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        RenderPathMetricsSnapshot {
            full_frames: self.full_frames.load(Ordering::Relaxed),
            char_frames: self.char_frames.load(Ordering::Relaxed),
            down_frames: self.down_frames.load(Ordering::Relaxed),
            minimal_frames: self.minimal_frames.load(Ordering::Relaxed),
            cursor_frames: self.cursor_frames.load(Ordering::Relaxed),
            help_frames: self.help_frames.load(Ordering::Relaxed),
            status_full: self.status_full.load(Ordering::Relaxed),
            status_right_only: self.status_right_only.load(Ordering::Relaxed),
            title_draws: self.title_draws.load(Ordering::Relaxed),
            degraded_full: self.degraded_full.load(Ordering::Relaxed),
            reentrant_skips: self.reentrant_skips.load(Ordering::Relaxed),
            text_commands: self.text_commands.load(Ordering::Relaxed),
            cells_printed: self.cells_printed.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_batch(&self, text_commands: u64, cells: u64) {
        self.text_commands
            .fetch_add(text_commands, Ordering::Relaxed);
        self.cells_printed.fetch_add(cells, Ordering::Relaxed);
    }
}
