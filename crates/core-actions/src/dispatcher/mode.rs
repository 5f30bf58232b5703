//! Help overlay, line spacing and quit confirmation.

use super::DispatchResult;
use core_state::{EditorState, Prompt, RenderRequest};

pub(crate) fn enter_help(state: &mut EditorState) -> DispatchResult {
    state.prompt = Prompt::Help;
    state.request(RenderRequest::Full);
    DispatchResult::handled()
}

/// Any key closes the overlay; the key itself is swallowed.
pub(crate) fn leave_help(state: &mut EditorState) -> DispatchResult {
    state.prompt = Prompt::None;
    state.request(RenderRequest::Full);
    state.render.mark_status();
    DispatchResult::handled()
}

pub(crate) fn set_spacing(state: &mut EditorState, double: bool) -> DispatchResult {
    state.view.double_spacing = double;
    tracing::debug!(target: "actions.dispatch", double, eff_rows = state.view.eff_rows(), "spacing");
    state.set_status(if double { "Double-spacing" } else { "Single-spacing" });
    state.request(RenderRequest::Full);
    DispatchResult::handled()
}

/// Quit immediately when clean; a dirty buffer needs a second Ctrl+Q in a
/// row.
pub(crate) fn handle_quit(state: &mut EditorState) -> DispatchResult {
    if state.dirty && !state.quit_confirm {
        state.quit_confirm = true;
        state.set_status("File modified - ^S to save, ^Q again to quit anyway");
        return DispatchResult::handled();
    }
    tracing::info!(target: "actions.dispatch", dirty = state.dirty, "quit");
    DispatchResult::quit()
}
