//! Raw `(mask, code)` keys to [`Action`]s.
//!
//! Precedence follows the key model: printable bytes first, then Tab and
//! Enter, then the Shift family (selection extension, Shift+Delete), the
//! Ctrl family (word motion, paging, commands), plain arrows, and finally
//! the editing keys. Arrow keys share codes with Backspace/Tab, so the
//! arrow mask bit always decides.

use crate::{Action, ClipboardOp, EditKind, MotionKind};
use core_input::{KeyMask, RawKey, codes};

const CTRL_A: u8 = b'a' & 0x1F;
const CTRL_C: u8 = b'c' & 0x1F;
const CTRL_F: u8 = b'f' & 0x1F;
const CTRL_G: u8 = b'g' & 0x1F;
const CTRL_H: u8 = b'h' & 0x1F;
const CTRL_Q: u8 = b'q' & 0x1F;
const CTRL_S: u8 = b's' & 0x1F;
const CTRL_V: u8 = b'v' & 0x1F;
const CTRL_X: u8 = b'x' & 0x1F;
const CTRL_Z: u8 = b'z' & 0x1F;

/// Ctrl+Q as a raw key; the dispatcher compares against it to keep the
/// quit confirmation armed.
pub(crate) fn is_quit(key: RawKey) -> bool {
    key.mask.contains(KeyMask::CTRL) && key.code == CTRL_Q
}

pub fn translate_key(key: RawKey) -> Option<Action> {
    let mask = key.mask;
    let code = key.code;
    let shift = mask.contains(KeyMask::SHIFT);
    let ctrl = mask.contains(KeyMask::CTRL);

    let plain = mask.is_empty() || shift || mask.contains(KeyMask::SPACE);
    if (32..127).contains(&code) && plain {
        return Some(Action::Edit(EditKind::InsertByte(code)));
    }
    if code == codes::TAB && !mask.contains(KeyMask::RIGHT) {
        return Some(Action::Edit(EditKind::InsertByte(codes::TAB)));
    }
    if code == codes::ENTER {
        return Some(Action::Edit(if shift {
            EditKind::AltNewline
        } else {
            EditKind::Newline
        }));
    }

    if shift {
        return shifted(mask, code);
    }
    if ctrl {
        return controlled(mask, code);
    }

    if let Some(motion) = arrow_motion(mask, code) {
        return Some(Action::Motion(motion));
    }
    match code {
        codes::DELETE => Some(Action::Edit(EditKind::DeleteForward)),
        codes::BACKSPACE if !mask.contains(KeyMask::LEFT) => Some(Action::Edit(EditKind::Backspace)),
        codes::ESC => Some(Action::Cancel),
        _ => None,
    }
}

fn arrow_motion(mask: KeyMask, code: u8) -> Option<MotionKind> {
    if mask.contains(KeyMask::UP) && code == codes::UP {
        Some(MotionKind::Up)
    } else if mask.contains(KeyMask::DOWN) && code == codes::DOWN {
        Some(MotionKind::Down)
    } else if mask.contains(KeyMask::LEFT) && code == codes::LEFT {
        Some(MotionKind::Left)
    } else if mask.contains(KeyMask::RIGHT) && code == codes::RIGHT {
        Some(MotionKind::Right)
    } else {
        None
    }
}

fn shifted(mask: KeyMask, code: u8) -> Option<Action> {
    if code == codes::DELETE {
        return Some(Action::Clipboard(ClipboardOp::Cut));
    }
    let motion = arrow_motion(mask, code)?;
    let motion = match motion {
        MotionKind::Left if mask.contains(KeyMask::CTRL) => MotionKind::WordLeft,
        MotionKind::Right if mask.contains(KeyMask::CTRL) => MotionKind::WordRight,
        other => other,
    };
    Some(Action::Extend(motion))
}

fn controlled(mask: KeyMask, code: u8) -> Option<Action> {
    if let Some(motion) = arrow_motion(mask, code) {
        return Some(match motion {
            MotionKind::Left => Action::Motion(MotionKind::WordLeft),
            MotionKind::Right => Action::Motion(MotionKind::WordRight),
            MotionKind::Up => Action::PageUp,
            _ => Action::PageDown,
        });
    }
    let action = match code {
        CTRL_Q => Action::Quit,
        CTRL_S => Action::Save,
        CTRL_F => Action::Find,
        CTRL_G => Action::Goto,
        CTRL_H => Action::Help,
        CTRL_A => Action::SelectAll,
        CTRL_C => Action::Clipboard(ClipboardOp::Copy),
        CTRL_X => Action::Clipboard(ClipboardOp::Cut),
        CTRL_V => Action::Clipboard(ClipboardOp::Paste),
        CTRL_Z => Action::Undo,
        codes::DIGIT_ONE => Action::SingleSpacing,
        codes::DIGIT_TWO => Action::DoubleSpacing,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_and_space_insert() {
        assert_eq!(
            translate_key(RawKey::byte(b'a')),
            Some(Action::Edit(EditKind::InsertByte(b'a')))
        );
        assert_eq!(
            translate_key(RawKey::byte(b' ')),
            Some(Action::Edit(EditKind::InsertByte(b' ')))
        );
        assert_eq!(
            translate_key(RawKey::byte(b'A').shift()),
            Some(Action::Edit(EditKind::InsertByte(b'A')))
        );
    }

    #[test]
    fn arrows_win_over_shared_codes() {
        assert_eq!(translate_key(RawKey::left()), Some(Action::Motion(MotionKind::Left)));
        assert_eq!(translate_key(RawKey::right()), Some(Action::Motion(MotionKind::Right)));
        assert_eq!(
            translate_key(RawKey::backspace()),
            Some(Action::Edit(EditKind::Backspace))
        );
        assert_eq!(
            translate_key(RawKey::tab()),
            Some(Action::Edit(EditKind::InsertByte(codes::TAB)))
        );
    }

    #[test]
    fn enter_variants() {
        assert_eq!(translate_key(RawKey::enter()), Some(Action::Edit(EditKind::Newline)));
        assert_eq!(
            translate_key(RawKey::enter().shift()),
            Some(Action::Edit(EditKind::AltNewline))
        );
    }

    #[test]
    fn shift_family_extends() {
        assert_eq!(
            translate_key(RawKey::up().shift()),
            Some(Action::Extend(MotionKind::Up))
        );
        assert_eq!(
            translate_key(RawKey::left().shift().with(KeyMask::CTRL)),
            Some(Action::Extend(MotionKind::WordLeft))
        );
        assert_eq!(
            translate_key(RawKey::right().shift()),
            Some(Action::Extend(MotionKind::Right))
        );
        assert_eq!(
            translate_key(RawKey::delete().shift()),
            Some(Action::Clipboard(ClipboardOp::Cut))
        );
    }

    #[test]
    fn ctrl_family() {
        assert_eq!(
            translate_key(RawKey::right().with(KeyMask::CTRL)),
            Some(Action::Motion(MotionKind::WordRight))
        );
        assert_eq!(translate_key(RawKey::up().with(KeyMask::CTRL)), Some(Action::PageUp));
        assert_eq!(translate_key(RawKey::down().with(KeyMask::CTRL)), Some(Action::PageDown));
        assert_eq!(translate_key(RawKey::ctrl(b'q')), Some(Action::Quit));
        assert_eq!(translate_key(RawKey::ctrl(b'H')), Some(Action::Help));
        assert_eq!(translate_key(RawKey::ctrl(b'1')), Some(Action::SingleSpacing));
        assert_eq!(translate_key(RawKey::ctrl(b'2')), Some(Action::DoubleSpacing));
        assert_eq!(translate_key(RawKey::ctrl(b'y')), None);
        assert!(is_quit(RawKey::ctrl(b'q')));
        assert!(!is_quit(RawKey::byte(CTRL_Q)));
    }

    #[test]
    fn editing_keys() {
        assert_eq!(
            translate_key(RawKey::delete()),
            Some(Action::Edit(EditKind::DeleteForward))
        );
        assert_eq!(translate_key(RawKey::esc()), Some(Action::Cancel));
        assert_eq!(translate_key(RawKey::new(KeyMask::ALT, 3)), None);
    }
}
