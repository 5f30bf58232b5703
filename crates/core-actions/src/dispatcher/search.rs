//! Incremental search prompt and find-next.
//!
//! The prompt collects up to `MAX_SEARCH` printable bytes. Enter or Ctrl+F
//! runs the search with the typed needle, or with the previous needle when nothing
//! was typed. A match selects the found text and leaves the editor in
//! FindReady, where Ctrl+F repeats the search from just past the cursor.

use super::{DispatchResult, ensure_visible};
use crate::{Action, EditKind};
use core_state::{EditorState, MAX_SEARCH, Prompt, RenderRequest};
use core_text::is_printable;

pub(crate) fn start(state: &mut EditorState) -> DispatchResult {
    state.prompt = Prompt::Search(String::new());
    state.set_status("Find: ");
    DispatchResult::handled()
}

pub(crate) fn handle_prompt_key(action: Option<Action>, state: &mut EditorState) -> DispatchResult {
    let Prompt::Search(input) = &mut state.prompt else {
        return DispatchResult::ignored();
    };
    match action {
        Some(Action::Cancel) => {
            state.prompt = Prompt::None;
            state.set_status("Find cancelled");
            return DispatchResult::handled();
        }
        Some(Action::Edit(EditKind::Newline | EditKind::AltNewline) | Action::Find) => {
            if !input.is_empty() {
                state.last_search = std::mem::take(input);
            } else if state.last_search.is_empty() {
                state.set_status("Find: ");
                return DispatchResult::handled();
            }
            return find_next(state);
        }
        Some(Action::Edit(EditKind::Backspace | EditKind::DeleteForward)) => {
            input.pop();
        }
        Some(Action::Edit(EditKind::InsertByte(b))) if is_printable(b) => {
            if input.len() < MAX_SEARCH {
                input.push(char::from(b));
            }
        }
        _ => {}
    }
    let msg = format!("Find: {input}");
    state.set_status(msg);
    DispatchResult::handled()
}

/// Search forward for `last_search` starting one byte past the cursor.
pub(crate) fn find_next(state: &mut EditorState) -> DispatchResult {
    if state.last_search.is_empty() {
        state.prompt = Prompt::None;
        state.set_status("No search string");
        return DispatchResult::handled();
    }
    let from = state.cursor.pos + 1;
    let needle = state.last_search.clone();
    match state.buffer.find_forward(needle.as_bytes(), from) {
        Some(at) => {
            tracing::debug!(target: "actions.search", at, needle_len = needle.len(), "found");
            // Anchored at the far end so shift-motion moves the start.
            state.set_cursor(at);
            state.selection.select(at + needle.len(), at, at + needle.len());
            ensure_visible(state);
            state.prompt = Prompt::FindReady;
            state.set_status(format!("Found: {needle} - Press Ctrl+F to find next"));
        }
        None => {
            tracing::debug!(target: "actions.search", from, needle_len = needle.len(), "not_found");
            state.prompt = Prompt::None;
            state.set_status(format!("Not found: {needle}"));
        }
    }
    state.request(RenderRequest::Full);
    DispatchResult::handled()
}
