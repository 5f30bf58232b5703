//! Copy / cut / paste against the external clipboard block.
//!
//! Failures are never fatal: they become status messages and the buffer is
//! left as it was. Cut only deletes once the copy succeeded. Paste replaces
//! an active selection and inserts byte by byte (one undo entry each)
//! until the buffer fills.

use super::DispatchResult;
use super::edit::delete_selection;
use crate::ClipboardOp;
use core_state::{ClipboardError, ClipboardService, EditorState, RenderRequest};

pub(crate) fn handle_clipboard(
    op: ClipboardOp,
    state: &mut EditorState,
    clipboard: &mut dyn ClipboardService,
) -> DispatchResult {
    match op {
        ClipboardOp::Copy => {
            if let Some(n) = copy(state, clipboard, "Nothing selected to copy") {
                state.set_status(format!("Copied {n} chars to clipboard"));
            }
        }
        ClipboardOp::Cut => {
            if let Some(n) = copy(state, clipboard, "Nothing selected to cut") {
                delete_selection(state);
                state.set_status(format!("Cut {n} chars to clipboard"));
            }
        }
        ClipboardOp::Paste => paste(state, clipboard),
    }
    DispatchResult::handled()
}

fn error_message(err: &ClipboardError) -> String {
    match err {
        ClipboardError::Unavailable => "No clipboard available".to_string(),
        ClipboardError::Empty => "Clipboard empty".to_string(),
        ClipboardError::TooLarge { len, max } => {
            format!("Selection too large ({len} chars, max {}K)", max / 1024)
        }
        ClipboardError::Alloc { .. } => err.to_string(),
    }
}

/// Copy the selection. Returns the byte count on success; otherwise the
/// reason is already on the status line.
fn copy(
    state: &mut EditorState,
    clipboard: &mut dyn ClipboardService,
    nothing_selected: &str,
) -> Option<usize> {
    let Some((head, tail)) = state.selection_segments() else {
        state.set_status(nothing_selected);
        return None;
    };
    if !clipboard.is_available() {
        state.set_status("No clipboard available");
        return None;
    }
    match clipboard.copy(head, tail) {
        Ok(n) => Some(n),
        Err(e) => {
            state.set_status(error_message(&e));
            None
        }
    }
}

fn paste(state: &mut EditorState, clipboard: &mut dyn ClipboardService) {
    let bytes = match clipboard.paste() {
        Ok(bytes) => bytes,
        Err(e) => {
            state.set_status(error_message(&e));
            return;
        }
    };
    delete_selection(state);
    let start = state.cursor.pos;
    let total = bytes.len();
    let mut inserted = 0;
    for &b in &bytes {
        if state.insert_byte(b).is_err() {
            break;
        }
        inserted += 1;
    }
    tracing::debug!(target: "actions.edit", start, inserted, total, "paste");
    if inserted > 0 {
        state.request(RenderRequest::DownFrom(start));
    }
    if inserted < total {
        state.set_status(format!("Buffer full - pasted {inserted} of {total} chars"));
    } else {
        state.set_status(format!("Pasted {total} chars from clipboard"));
    }
}
