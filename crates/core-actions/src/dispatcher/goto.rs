//! Goto-line prompt.

use super::{DispatchResult, ensure_visible};
use crate::{Action, EditKind};
use core_state::{EditorState, MAX_GOTO_DIGITS, Prompt, RenderRequest};
use core_text::motion::seek_line;

pub(crate) fn start(state: &mut EditorState) -> DispatchResult {
    state.prompt = Prompt::Goto(String::new());
    state.set_status("Goto line: ");
    DispatchResult::handled()
}

pub(crate) fn handle_prompt_key(action: Option<Action>, state: &mut EditorState) -> DispatchResult {
    let Prompt::Goto(input) = &mut state.prompt else {
        return DispatchResult::ignored();
    };
    match action {
        Some(Action::Cancel) => {
            state.prompt = Prompt::None;
            state.set_status("Goto cancelled");
            return DispatchResult::handled();
        }
        Some(Action::Edit(EditKind::Newline | EditKind::AltNewline)) => {
            let digits = std::mem::take(input);
            state.prompt = Prompt::None;
            if !digits.is_empty() {
                jump(state, &digits);
            }
            return DispatchResult::handled();
        }
        Some(Action::Edit(EditKind::Backspace | EditKind::DeleteForward)) => {
            input.pop();
        }
        Some(Action::Edit(EditKind::InsertByte(b))) if b.is_ascii_digit() => {
            if input.len() < MAX_GOTO_DIGITS {
                input.push(char::from(b));
            }
        }
        _ => {}
    }
    let msg = format!("Goto line: {input}");
    state.set_status(msg);
    DispatchResult::handled()
}

/// `digits` holds at most seven ASCII digits, so it always parses.
fn jump(state: &mut EditorState, digits: &str) {
    let requested: usize = digits.parse().unwrap_or(0);
    if requested == 0 {
        state.set_status("Invalid line number");
        return;
    }
    let target = seek_line(&state.buffer, requested - 1);
    state.set_cursor(target.pos);
    let reached = target.line + 1;
    if reached < requested {
        state.set_status(format!(
            "Jumped to line {reached} (last line, requested {requested})"
        ));
    } else {
        state.set_status(format!("Jumped to line {requested}"));
    }
    tracing::debug!(target: "actions.motion", requested, reached, pos = target.pos, "goto");
    state.selection.clear();
    ensure_visible(state);
    state.request(RenderRequest::Full);
}
