//! Dispatcher applying an `Action` to the editor state.
//!
//! Sub-modules by concern:
//! * `motion`    - cursor movement, selection extension and paging
//! * `edit`      - insert / delete with update-class selection
//! * `clipboard` - copy / cut / paste
//! * `undo`      - undo
//! * `search`    - search prompt and find-next
//! * `goto`      - goto-line prompt
//! * `mode`      - help overlay, spacing, quit confirmation
//!
//! Prompt modes see every key first: Help consumes any key, Searching and
//! GotoPrompt interpret their own keys and ignore the rest, FindReady only
//! keeps Ctrl+F and otherwise falls back to normal processing.

use crate::Action;
use crate::key_translator::{is_quit, translate_key};
use core_input::RawKey;
use core_state::{ClipboardService, EditorState, Prompt, RenderRequest};
use core_text::motion::count_terminators;

mod clipboard;
mod edit;
mod goto;
mod mode;
mod motion;
mod search;
mod undo;

/// Visual lines of leading context kept above a jump target.
pub const JUMP_CONTEXT_LINES: usize = 5;

/// Result of dispatching a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The key mapped to something.
    pub handled: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn handled() -> Self {
        Self {
            handled: true,
            quit: false,
        }
    }

    pub fn ignored() -> Self {
        Self {
            handled: false,
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            handled: true,
            quit: true,
        }
    }
}

/// Translate and apply one raw key. Any key other than Ctrl+Q disarms a
/// pending quit confirmation.
pub fn dispatch_key(
    key: RawKey,
    state: &mut EditorState,
    clipboard: &mut dyn ClipboardService,
) -> DispatchResult {
    let quit_key = is_quit(key);
    let result = dispatch(translate_key(key), state, clipboard);
    if !quit_key {
        state.quit_confirm = false;
    }
    tracing::trace!(
        target: "actions.dispatch",
        mask = key.mask.bits(),
        code = key.code,
        handled = result.handled,
        "key"
    );
    result
}

/// Apply an action (or an unmapped key, `None`) to the editor state.
pub fn dispatch(
    action: Option<Action>,
    state: &mut EditorState,
    clipboard: &mut dyn ClipboardService,
) -> DispatchResult {
    match state.prompt {
        Prompt::Help => return mode::leave_help(state),
        Prompt::Search(_) => return search::handle_prompt_key(action, state),
        Prompt::Goto(_) => return goto::handle_prompt_key(action, state),
        Prompt::FindReady if action == Some(Action::Find) => return search::find_next(state),
        Prompt::FindReady => {
            state.prompt = Prompt::None;
            state.status.clear();
            state.render.mark_status();
        }
        Prompt::None => {}
    }

    let Some(action) = action else {
        return DispatchResult::ignored();
    };
    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::Extend(kind) => motion::handle_extend(kind, state),
        Action::PageUp => motion::page_up(state),
        Action::PageDown => motion::page_down(state),
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::Clipboard(op) => clipboard::handle_clipboard(op, state, clipboard),
        Action::SelectAll => motion::select_all(state),
        Action::Cancel => motion::clear_selection(state),
        Action::Undo => undo::handle_undo(state),
        Action::Save => {
            crate::io_ops::save_file(state);
            DispatchResult::handled()
        }
        Action::Quit => mode::handle_quit(state),
        Action::Find => search::start(state),
        Action::Goto => goto::start(state),
        Action::Help => mode::enter_help(state),
        Action::SingleSpacing => mode::set_spacing(state, false),
        Action::DoubleSpacing => mode::set_spacing(state, true),
    };
    if result.handled {
        // Position info on the status line follows every handled key.
        state.render.mark_status();
    }
    result
}

/// True when the visual line holding `pos` is one of the `eff_rows` visual
/// lines starting at `view.top`.
pub fn is_visible(state: &EditorState, pos: usize) -> bool {
    let top = state.view.top;
    if pos < top {
        return false;
    }
    let layout = state.layout();
    let buf = &state.buffer;
    let target = layout.visual_line_start(buf, pos);
    let mut line = top;
    for _ in 0..state.view.eff_rows() {
        if line == target {
            return true;
        }
        let next = layout.visual_line_next(buf, line);
        if next <= line {
            break;
        }
        line = next;
    }
    false
}

/// Scroll so the cursor is visible with `JUMP_CONTEXT_LINES` of context
/// above it. Scrolling forces a full repaint.
pub fn ensure_visible(state: &mut EditorState) -> bool {
    if is_visible(state, state.cursor.pos) {
        return false;
    }
    let top = state
        .layout()
        .back_visual_lines(&state.buffer, state.cursor.pos, JUMP_CONTEXT_LINES);
    tracing::debug!(target: "actions.dispatch", from = state.view.top, to = top, "jump_scroll");
    state.view.top = top;
    state.request(RenderRequest::Full);
    true
}

/// Repaint request covering highlight changes in `[a, b)`: the rest of the
/// logical line when no terminator lies in between, otherwise down to the
/// bottom of the window.
pub(crate) fn request_span_repaint(state: &mut EditorState, a: usize, b: usize) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if lo == hi {
        return;
    }
    let req = if count_terminators(&state.buffer, lo, hi) == 0 {
        RenderRequest::MinimalFrom(lo)
    } else {
        RenderRequest::DownFrom(lo)
    };
    state.request(req);
}
