//! Incremental rendering for the text window, title bar and status line.
//!
//! Pipeline per loop turn:
//! 1. Handlers record one merged `RenderRequest` on the editor state.
//! 2. `scheduler` consumes it once, brings the cursor into view (scrolling
//!    forces `Full`) and yields a `Decision`.
//! 3. `render_engine` executes the effective path through a `BatchWriter`,
//!    which coalesces byte runs into single `Text` commands.
//!
//! Exposed components:
//! - `scheduler`: request consumption, scrolling, semantic metrics.
//! - `render_engine`: full / char / down / minimal / cursor paths, help overlay.
//! - `status`, `title`, `help`: line composition.
//! - `partial_metrics`: executed-path and batching counters.

use anyhow::Result;
use core_state::EditorState;
use core_terminal::OutputSink;

pub mod batch_writer;
pub mod help;
pub mod partial_metrics;
pub mod render_engine;
pub mod scheduler;
pub mod status;
pub mod title;

pub use render_engine::RenderEngine;
pub use scheduler::{Decision, RenderScheduler};

/// Scheduler and engine wired together, as driven by the main loop.
#[derive(Debug, Default)]
pub struct Renderer {
    pub scheduler: RenderScheduler,
    pub engine: RenderEngine,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render whatever is pending. Returns the decision executed, if any.
    pub fn render_pending(
        &mut self,
        state: &mut EditorState,
        sink: &mut dyn OutputSink,
    ) -> Result<Option<Decision>> {
        let Some(decision) = self.scheduler.consume(state) else {
            return Ok(None);
        };
        self.engine.render(state, &decision, sink)?;
        Ok(Some(decision))
    }
}
