//! Text edit handling (insert / backspace / forward delete / enter).
//!
//! Each edit picks the cheapest render request that covers what changed:
//!
//! | change                                                   | request          |
//! |----------------------------------------------------------|------------------|
//! | buffer emptied, terminator deleted                       | `Full`           |
//! | terminator inserted, visual row count of the line changed | `DownFrom(pos)`  |
//! | tab inserted or deleted                                  | `MinimalFrom(pos)` |
//! | any other byte                                           | `CharFrom(pos)`  |
//!
//! Row counts are measured from the visual line of the edit point to the
//! end of its logical line; rows above the edit point never rewrap.

use super::DispatchResult;
use crate::EditKind;
use core_state::{EditorState, RenderRequest};
use core_text::{TAB, is_line_end};

pub(crate) fn handle_edit(kind: EditKind, state: &mut EditorState) -> DispatchResult {
    match kind {
        EditKind::InsertByte(b) => {
            replace_selection(state);
            insert(state, b);
        }
        EditKind::Newline => {
            replace_selection(state);
            insert(state, state.enter_terminator);
        }
        EditKind::AltNewline => {
            replace_selection(state);
            insert(state, state.alternate_terminator());
        }
        EditKind::Backspace => {
            if !delete_selection(state) {
                backspace(state);
            }
        }
        EditKind::DeleteForward => {
            if !delete_selection(state) {
                delete_forward(state);
            }
        }
    }
    DispatchResult::handled()
}

fn rows_from(state: &EditorState, pos: usize) -> usize {
    state.layout().rows_to_line_end(&state.buffer, pos)
}

/// Insert at the cursor. Reports a full buffer on the status line.
pub(crate) fn insert(state: &mut EditorState, byte: u8) -> bool {
    let pos = state.cursor.pos;
    let rows_before = rows_from(state, pos);
    if let Err(e) = state.insert_byte(byte) {
        tracing::debug!(target: "actions.edit", error = %e, "insert_rejected");
        let kib = state.buffer.capacity() / 1024;
        state.set_status(format!("Buffer full ({kib}K limit)"));
        return false;
    }
    let req = if is_line_end(byte) || rows_from(state, pos) != rows_before {
        RenderRequest::DownFrom(pos)
    } else if byte == TAB {
        RenderRequest::MinimalFrom(pos)
    } else {
        RenderRequest::CharFrom(pos)
    };
    tracing::trace!(target: "actions.edit", op = "insert", pos, byte, ?req, "edit");
    state.request(req);
    true
}

fn backspace(state: &mut EditorState) {
    let pos = state.cursor.pos;
    if pos == 0 {
        return;
    }
    let rows_before = rows_from(state, pos - 1);
    if let Some(byte) = state.delete_back() {
        after_delete(state, pos - 1, byte, rows_before, "backspace");
    }
}

fn delete_forward(state: &mut EditorState) {
    let pos = state.cursor.pos;
    if pos >= state.len() {
        return;
    }
    let rows_before = rows_from(state, pos);
    if let Some(byte) = state.delete_forward() {
        after_delete(state, pos, byte, rows_before, "delete_forward");
    }
}

/// `pos` is where the removed byte used to be.
fn after_delete(state: &mut EditorState, pos: usize, byte: u8, rows_before: usize, op: &str) {
    let req = if state.is_empty() || is_line_end(byte) {
        RenderRequest::Full
    } else if rows_from(state, pos) != rows_before {
        RenderRequest::DownFrom(pos)
    } else if byte == TAB {
        RenderRequest::MinimalFrom(pos)
    } else {
        RenderRequest::CharFrom(pos)
    };
    tracing::trace!(target: "actions.edit", op, pos, byte, ?req, "edit");
    state.request(req);
}

/// Delete the active selection, if any, requesting a repaint from its
/// start. Returns whether something was deleted.
pub(crate) fn delete_selection(state: &mut EditorState) -> bool {
    let Some(span) = state.delete_selection() else {
        return false;
    };
    let req = if state.is_empty() {
        RenderRequest::Full
    } else {
        RenderRequest::DownFrom(span.start)
    };
    tracing::debug!(target: "actions.edit", start = span.start, len = span.len(), ?req, "selection_deleted");
    state.request(req);
    true
}

/// Typing over a selection replaces it.
fn replace_selection(state: &mut EditorState) {
    delete_selection(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::ViewState;
    use core_text::GapBuffer;

    fn state(text: &str, cols: usize, capacity: usize) -> EditorState {
        let buf = GapBuffer::from_bytes(text.as_bytes(), capacity).unwrap();
        EditorState::new(buf, ViewState::new(cols, 10, 4), 50)
    }

    fn request(s: &mut EditorState) -> RenderRequest {
        s.render.take().unwrap().request
    }

    #[test]
    fn plain_insert_is_char_update() {
        let mut s = state("ab", 10, 64);
        s.set_cursor(1);
        handle_edit(EditKind::InsertByte(b'x'), &mut s);
        assert_eq!(s.buffer.to_vec(), b"axb");
        assert_eq!(request(&mut s), RenderRequest::CharFrom(1));
    }

    #[test]
    fn insert_that_wraps_redraws_down() {
        let mut s = state("abc", 4, 64);
        s.set_cursor(3);
        handle_edit(EditKind::InsertByte(b'd'), &mut s);
        assert_eq!(request(&mut s), RenderRequest::DownFrom(3));
    }

    #[test]
    fn tab_insert_is_minimal() {
        let mut s = state("ab", 20, 64);
        handle_edit(EditKind::InsertByte(TAB), &mut s);
        assert_eq!(request(&mut s), RenderRequest::MinimalFrom(0));
    }

    #[test]
    fn enter_inserts_configured_terminators() {
        let mut s = state("ab", 20, 64);
        s.set_cursor(1);
        handle_edit(EditKind::Newline, &mut s);
        handle_edit(EditKind::AltNewline, &mut s);
        assert_eq!(s.buffer.to_vec(), b"a\r\nb");
        assert_eq!(s.total_lines, 3);
        assert_eq!(s.cursor.line, 2);
        assert_eq!(request(&mut s), RenderRequest::DownFrom(1));
    }

    #[test]
    fn deleting_terminator_or_last_byte_is_full() {
        let mut s = state("a\nb", 20, 64);
        s.set_cursor(2);
        handle_edit(EditKind::Backspace, &mut s);
        assert_eq!(s.buffer.to_vec(), b"ab");
        assert_eq!(request(&mut s), RenderRequest::Full);

        let mut s = state("a", 20, 64);
        s.set_cursor(1);
        handle_edit(EditKind::Backspace, &mut s);
        assert_eq!(request(&mut s), RenderRequest::Full);
    }

    #[test]
    fn backspace_and_delete_forward_are_char_updates() {
        let mut s = state("abcd", 20, 64);
        s.set_cursor(2);
        handle_edit(EditKind::Backspace, &mut s);
        assert_eq!(s.buffer.to_vec(), b"acd");
        assert_eq!(request(&mut s), RenderRequest::CharFrom(1));
        handle_edit(EditKind::DeleteForward, &mut s);
        assert_eq!(s.buffer.to_vec(), b"ad");
        assert_eq!(s.cursor.pos, 1);
        assert_eq!(request(&mut s), RenderRequest::CharFrom(1));
    }

    #[test]
    fn unwrapping_delete_redraws_down() {
        // Two exactly full rows plus the empty row after them.
        let mut s = state("abcdefgh", 4, 64);
        s.set_cursor(1);
        handle_edit(EditKind::DeleteForward, &mut s);
        assert_eq!(request(&mut s), RenderRequest::DownFrom(1));
    }

    #[test]
    fn edges_are_noops() {
        let mut s = state("ab", 20, 64);
        handle_edit(EditKind::Backspace, &mut s);
        s.set_cursor(2);
        handle_edit(EditKind::DeleteForward, &mut s);
        assert_eq!(s.buffer.to_vec(), b"ab");
        assert!(s.undo.is_empty());
        assert!(s.render.take().is_none());
    }

    #[test]
    fn full_buffer_reports_limit() {
        let mut s = state("ab", 20, 2);
        handle_edit(EditKind::InsertByte(b'x'), &mut s);
        assert_eq!(s.status.peek(), Some("Buffer full (0K limit)"));
        let mut s = state("", 20, 2048);
        for _ in 0..2048 {
            handle_edit(EditKind::InsertByte(b'x'), &mut s);
        }
        handle_edit(EditKind::InsertByte(b'y'), &mut s);
        assert_eq!(s.status.peek(), Some("Buffer full (2K limit)"));
    }

    #[test]
    fn typing_replaces_selection() {
        let mut s = state("hello world", 40, 64);
        s.selection.select(0, 0, 5);
        s.set_cursor(5);
        handle_edit(EditKind::InsertByte(b'J'), &mut s);
        assert_eq!(s.buffer.to_vec(), b"J world");
        assert_eq!(s.cursor.pos, 1);
        assert_eq!(request(&mut s), RenderRequest::DownFrom(0));
    }
}
