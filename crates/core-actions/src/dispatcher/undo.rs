//! Undo handling. Each step reverts one byte; there is no redo.

use super::DispatchResult;
use core_state::{EditorState, RenderRequest};

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    match state.undo() {
        Ok(Some(entry)) => {
            tracing::trace!(target: "actions.edit", op = "undo", pos = entry.pos, remaining = state.undo.len(), "undo");
            state.set_status("Undone");
            state.request(RenderRequest::Full);
        }
        Ok(None) => state.set_status("Nothing to undo"),
        Err(e) => {
            tracing::debug!(target: "actions.edit", error = %e, "undo_rejected");
            let kib = state.buffer.capacity() / 1024;
            state.set_status(format!("Buffer full ({kib}K limit)"));
        }
    }
    DispatchResult::handled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::ViewState;
    use core_text::GapBuffer;

    #[test]
    fn undo_reports_and_repaints() {
        let buf = GapBuffer::from_bytes(b"", 64).unwrap();
        let mut s = EditorState::new(buf, ViewState::new(40, 10, 4), 50);
        handle_undo(&mut s);
        assert_eq!(s.status.take().as_deref(), Some("Nothing to undo"));

        s.insert_byte(b'a').unwrap();
        s.render.take();
        handle_undo(&mut s);
        assert!(s.is_empty());
        assert_eq!(s.cursor.pos, 0);
        assert_eq!(s.status.take().as_deref(), Some("Undone"));
        assert_eq!(s.render.take().unwrap().request, RenderRequest::Full);
    }

    #[test]
    fn undo_that_no_longer_fits_reports_full() {
        let buf = GapBuffer::from_bytes(b"ab", 2048).unwrap();
        let mut s = EditorState::new(buf, ViewState::new(40, 10, 4), 50);
        s.set_cursor(2);
        s.delete_back();
        while !s.buffer.is_full() {
            let end = s.buffer.len();
            s.buffer.insert_at(end, b'z').unwrap();
        }
        s.render.take();
        handle_undo(&mut s);
        assert_eq!(s.status.take().as_deref(), Some("Buffer full (2K limit)"));
        assert_eq!(s.undo.len(), 1);
        assert_eq!(s.render.peek(), None);
    }
}
