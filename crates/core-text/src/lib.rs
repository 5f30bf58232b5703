//! Text storage and layout primitives.
//!
//! * `gap_buffer` - the single fixed-capacity byte store.
//! * `layout`     - visual (wrapped, tab-expanded) line geometry.
//! * `motion`     - logical line bounds, word motion, line counting.
//!
//! Text is a plain byte sequence. Either CR or LF terminates a line; the two
//! are treated identically and never paired.

pub mod gap_buffer;
pub mod layout;
pub mod motion;

pub use gap_buffer::{BUF_SIZE, BufferError, GapBuffer};
pub use layout::{ScreenOffset, TAB, VisualLayout};
pub use motion::{LineTarget, is_word_char};

pub const LF: u8 = 10;
pub const CR: u8 = 13;

#[inline]
pub fn is_line_end(b: u8) -> bool {
    b == LF || b == CR
}

/// Printable ASCII drawn as-is by the renderer.
#[inline]
pub fn is_printable(b: u8) -> bool {
    (32..127).contains(&b)
}
