use crate::{KeyMask, KeySource, RawKey, codes};
use anyhow::Result;
use crossterm::event::{
    self, Event as CEvent, KeyCode as CKeyCode, KeyEvent as CKeyEvent,
    KeyEventKind as CKeyEventKind, KeyModifiers as CKeyModifiers,
};
use std::time::Duration;
use tracing::trace;

/// Map a crossterm key event into a raw `(mask, code)` pair.
///
/// Returns `None` for releases and for keys the editor has no binding for
/// (function keys, media keys, non-ASCII characters).
pub fn map_key_event(event: &CKeyEvent) -> Option<RawKey> {
    if matches!(event.kind, CKeyEventKind::Release) {
        return None;
    }
    let mods = map_mod_mask(event.modifiers);
    let key = match event.code {
        CKeyCode::Char(c) if !c.is_ascii() => return None,
        CKeyCode::Char(c) if mods.contains(KeyMask::CTRL) => {
            let b = c as u8;
            if b.is_ascii_alphabetic() || b == codes::DIGIT_ONE || b == codes::DIGIT_TWO {
                RawKey::ctrl(b).with(mods)
            } else {
                return None;
            }
        }
        CKeyCode::Char(' ') => RawKey::byte(b' ').with(mods),
        CKeyCode::Char(c) => RawKey::new(mods, c as u8),
        CKeyCode::Enter => RawKey::enter().with(mods),
        CKeyCode::Esc => RawKey::esc(),
        CKeyCode::Tab => RawKey::tab(),
        CKeyCode::BackTab => RawKey::tab().shift(),
        CKeyCode::Backspace => RawKey::backspace().with(mods),
        CKeyCode::Delete => RawKey::delete().with(mods),
        CKeyCode::Up => RawKey::up().with(mods),
        CKeyCode::Down => RawKey::down().with(mods),
        CKeyCode::Left => RawKey::left().with(mods),
        CKeyCode::Right => RawKey::right().with(mods),
        CKeyCode::PageUp => RawKey::up().with(mods | KeyMask::CTRL),
        CKeyCode::PageDown => RawKey::down().with(mods | KeyMask::CTRL),
        _ => return None,
    };
    Some(key)
}

fn map_mod_mask(mods: CKeyModifiers) -> KeyMask {
    let mut out = KeyMask::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyMask::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyMask::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyMask::SHIFT;
    }
    out
}

/// Terminal key source backed by `crossterm::event::poll`.
pub struct CrosstermKeySource {
    interval: Duration,
}

impl CrosstermKeySource {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for CrosstermKeySource {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

impl KeySource for CrosstermKeySource {
    fn poll(&mut self) -> Result<Option<RawKey>> {
        if !event::poll(self.interval)? {
            return Ok(None);
        }
        match event::read()? {
            CEvent::Key(key) => {
                let raw = map_key_event(&key);
                trace!(target: "input.event", ?key, ?raw, "key");
                Ok(raw)
            }
            // Geometry is fixed for the session; everything else is ignored.
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: CKeyCode, mods: CKeyModifiers) -> Option<RawKey> {
        map_key_event(&CKeyEvent::new(code, mods))
    }

    #[test]
    fn arrows_carry_direction_bits_and_paired_codes() {
        assert_eq!(
            press(CKeyCode::Up, CKeyModifiers::NONE),
            Some(RawKey::new(KeyMask::UP, 12))
        );
        assert_eq!(
            press(CKeyCode::Left, CKeyModifiers::SHIFT | CKeyModifiers::CONTROL),
            Some(RawKey::new(KeyMask::LEFT | KeyMask::SHIFT | KeyMask::CTRL, 8))
        );
        assert_eq!(
            press(CKeyCode::PageDown, CKeyModifiers::NONE),
            Some(RawKey::new(KeyMask::DOWN | KeyMask::CTRL, 10))
        );
    }

    #[test]
    fn control_letters_and_digits() {
        assert_eq!(
            press(CKeyCode::Char('z'), CKeyModifiers::CONTROL),
            Some(RawKey::new(KeyMask::CTRL, 26))
        );
        assert_eq!(
            press(CKeyCode::Char('2'), CKeyModifiers::CONTROL),
            Some(RawKey::new(KeyMask::CTRL, 50))
        );
        assert_eq!(press(CKeyCode::Char('-'), CKeyModifiers::CONTROL), None);
    }

    #[test]
    fn printable_and_special_keys() {
        assert_eq!(
            press(CKeyCode::Char('A'), CKeyModifiers::SHIFT),
            Some(RawKey::new(KeyMask::SHIFT, b'A'))
        );
        assert_eq!(
            press(CKeyCode::Char(' '), CKeyModifiers::NONE),
            Some(RawKey::new(KeyMask::SPACE, b' '))
        );
        assert_eq!(
            press(CKeyCode::Backspace, CKeyModifiers::NONE),
            Some(RawKey::backspace())
        );
        assert_eq!(
            press(CKeyCode::Delete, CKeyModifiers::SHIFT),
            Some(RawKey::delete().shift())
        );
        assert_eq!(press(CKeyCode::Char('é'), CKeyModifiers::NONE), None);
        assert_eq!(press(CKeyCode::F(1), CKeyModifiers::NONE), None);
    }

    #[test]
    fn releases_are_dropped() {
        let mut ev = CKeyEvent::new(CKeyCode::Char('a'), CKeyModifiers::NONE);
        ev.kind = CKeyEventKind::Release;
        assert_eq!(map_key_event(&ev), None);
    }
}
