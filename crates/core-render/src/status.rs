//! Status line and help hint line.
//!
//! Status row layout (reverse video): the current status message on the
//! left, position info right-aligned with one column left free:
//! `[S:<sel> ]L:<line>/<total> C:<col> <kib>K`.
//!
//! A message is shown on the first status repaint after it was set and then
//! consumed. While the message is unchanged since the previous repaint only
//! the right segment is rewritten, with no line clear; a shorter right
//! segment is space-padded so it covers the previous one.

use crate::batch_writer::BatchWriter;
use anyhow::Result;
use core_state::{EditorState, Mode};
use core_terminal::TermCommand;

/// Right-hand status segment.
pub fn position_segment(state: &EditorState) -> String {
    let info = format!(
        "L:{}/{} C:{} {}K",
        state.cursor.line + 1,
        state.total_lines,
        state.cursor.col,
        state.len() / 1024
    );
    match state.selection.span() {
        Some(span) => format!("S:{} {}", span.len(), info),
        None => info,
    }
}

/// Contextual hint for the last screen row.
pub fn help_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Searching => "Ctrl+F=Find  Enter=Find  ESC=Cancel",
        Mode::GotoPrompt => "Enter line number  Enter=Go  ESC=Cancel",
        Mode::FindReady => "Ctrl+F=Find Next  Start typing to exit find mode",
        _ => "Ctrl+H for Help",
    }
}

/// What the status line showed last time it was drawn.
#[derive(Debug, Default, Clone)]
pub struct StatusCache {
    initialized: bool,
    message: String,
    right_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPaint {
    Full,
    RightOnly,
}

impl StatusCache {
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    /// Draw the status and hint rows. `force` clears and rewrites the whole
    /// status row regardless of the cached message.
    pub fn draw(
        &mut self,
        w: &mut BatchWriter<'_>,
        state: &mut EditorState,
        force: bool,
    ) -> Result<StatusPaint> {
        let cols = state.view.screen_cols;
        let row = state.view.status_row();

        let mut right = position_segment(state);
        if right.len() < self.right_len {
            let pad = self.right_len - right.len();
            right.extend(std::iter::repeat_n(' ', pad));
        }
        let right_len = right.len().min(cols.saturating_sub(1));
        let right_col = cols.saturating_sub(right_len + 1);

        let message = state.status.take().unwrap_or_default();
        let changed = message != self.message;

        w.command(TermCommand::ReverseOn)?;
        let paint = if changed || force || !self.initialized {
            w.move_to(0, row)?;
            w.command(TermCommand::ClearEol)?;
            w.move_to(0, row)?;
            let room = cols.saturating_sub(right_len + 1);
            let shown = message.len().min(room);
            w.text(&message.as_bytes()[..shown]);
            self.message = message;
            self.initialized = true;
            StatusPaint::Full
        } else {
            StatusPaint::RightOnly
        };
        w.move_to(right_col, row)?;
        w.text(&right.as_bytes()[..right_len]);
        w.command(TermCommand::ReverseOff)?;
        self.right_len = right_len;

        let hint = help_hint(state.mode());
        w.move_to(0, state.view.help_row())?;
        w.text(&hint.as_bytes()[..hint.len().min(cols)]);
        w.command(TermCommand::ClearEol)?;
        Ok(paint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::ViewState;
    use core_terminal::MemorySink;
    use core_text::GapBuffer;

    fn state(text: &str) -> EditorState {
        let buf = GapBuffer::from_bytes(text.as_bytes(), 4096).unwrap();
        EditorState::new(buf, ViewState::new(40, 10, 8), 8)
    }

    #[test]
    fn position_segment_formats() {
        let mut s = state("ab\ncd");
        s.set_cursor(4);
        s.cursor.col = 1;
        assert_eq!(position_segment(&s), "L:2/2 C:1 0K");
        s.selection.select(1, 1, 4);
        assert_eq!(position_segment(&s), "S:3 L:2/2 C:1 0K");
    }

    #[test]
    fn unchanged_message_rewrites_right_segment_only() {
        let mut s = state("abc");
        let mut cache = StatusCache::default();
        let mut sink = MemorySink::new();

        s.set_status("Saved 3 bytes");
        let mut w = BatchWriter::new(&mut sink);
        assert_eq!(cache.draw(&mut w, &mut s, false).unwrap(), StatusPaint::Full);
        w.finish().unwrap();
        assert!(sink.text().contains("Saved 3 bytes"));
        assert!(s.status.peek().is_none());

        // Message consumed: next draw clears it.
        sink.clear();
        let mut w = BatchWriter::new(&mut sink);
        assert_eq!(cache.draw(&mut w, &mut s, false).unwrap(), StatusPaint::Full);
        w.finish().unwrap();
        assert!(!sink.text().contains("Saved"));

        // Nothing new: right side only, no clear on the status row.
        sink.clear();
        let mut w = BatchWriter::new(&mut sink);
        assert_eq!(
            cache.draw(&mut w, &mut s, false).unwrap(),
            StatusPaint::RightOnly
        );
        w.finish().unwrap();
        assert_eq!(sink.count(|c| *c == TermCommand::ClearEol), 1); // hint row only
    }

    #[test]
    fn shorter_right_segment_is_padded() {
        let mut s = state("x");
        let mut cache = StatusCache::default();
        let mut sink = MemorySink::new();
        s.selection.select(0, 0, 1);
        let mut w = BatchWriter::new(&mut sink);
        cache.draw(&mut w, &mut s, false).unwrap();
        w.finish().unwrap();
        s.selection.clear();
        sink.clear();
        let mut w = BatchWriter::new(&mut sink);
        cache.draw(&mut w, &mut s, false).unwrap();
        w.finish().unwrap();
        assert!(sink.text().contains("L:1/1 C:0 0K    "));
    }

    #[test]
    fn hints_follow_mode() {
        assert_eq!(help_hint(Mode::Normal), "Ctrl+H for Help");
        assert!(help_hint(Mode::GotoPrompt).starts_with("Enter line number"));
    }
}
