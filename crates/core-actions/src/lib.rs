//! Key translation and the edit / selection / undo state machine.
//!
//! A raw key goes through [`translate_key`] into an [`Action`], then
//! [`dispatch`] applies it to the [`core_state::EditorState`]. Handlers
//! mutate the buffer through the state primitives and record exactly one
//! merged render request per keystroke; the render crate consumes it.
//!
//! Prompt modes (search, goto line, help) intercept actions before normal
//! interpretation. File load/save lives in [`io_ops`].

pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch, dispatch_key, ensure_visible, is_visible};
pub use key_translator::translate_key;

/// Cursor motions. `Extend` applies the same motion while growing the
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Printable byte or tab.
    InsertByte(u8),
    /// Configured terminator.
    Newline,
    /// The other terminator (Shift+Enter).
    AltNewline,
    Backspace,
    DeleteForward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
    Copy,
    Cut,
    Paste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    Extend(MotionKind),
    PageUp,
    PageDown,
    Edit(EditKind),
    Clipboard(ClipboardOp),
    SelectAll,
    /// Esc: cancel a prompt or clear the selection.
    Cancel,
    Undo,
    Save,
    Quit,
    Find,
    Goto,
    Help,
    SingleSpacing,
    DoubleSpacing,
}
