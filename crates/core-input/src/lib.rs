//! Key input capability.
//!
//! Keys reach the editor as raw `(modifier mask, character code)` pairs; an
//! arrow press carries its direction in the mask alongside a paired code.
//! Sources are polled without blocking: `Ok(None)` means no key is pending.

use anyhow::Result;
use bitflags::bitflags;
use std::collections::VecDeque;

mod key_token;

pub use key_token::{CrosstermKeySource, map_key_event};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct KeyMask: u8 {
        const SHIFT = 0x01;
        const CTRL  = 0x02;
        const ALT   = 0x04;
        const UP    = 0x08;
        const DOWN  = 0x10;
        const LEFT  = 0x20;
        const RIGHT = 0x40;
        const SPACE = 0x80;
    }
}

impl KeyMask {
    pub const ARROWS: KeyMask = KeyMask::UP
        .union(KeyMask::DOWN)
        .union(KeyMask::LEFT)
        .union(KeyMask::RIGHT);
}

/// Character codes paired with the mask.
pub mod codes {
    pub const ESC: u8 = 5;
    pub const BACKSPACE: u8 = 8;
    pub const TAB: u8 = 9;
    pub const ENTER: u8 = 13;
    pub const DELETE: u8 = 127;
    pub const UP: u8 = 12;
    pub const DOWN: u8 = 10;
    pub const LEFT: u8 = 8;
    pub const RIGHT: u8 = 9;
    pub const DIGIT_ONE: u8 = b'1';
    pub const DIGIT_TWO: u8 = b'2';
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawKey {
    pub mask: KeyMask,
    pub code: u8,
}

impl RawKey {
    pub const fn new(mask: KeyMask, code: u8) -> Self {
        Self { mask, code }
    }

    /// Unmodified byte; space carries the SPACE bit.
    pub fn byte(b: u8) -> Self {
        let mask = if b == b' ' {
            KeyMask::SPACE
        } else {
            KeyMask::empty()
        };
        Self::new(mask, b)
    }

    /// Ctrl + letter (`letter & 0x1F`) or Ctrl + digit.
    pub fn ctrl(c: u8) -> Self {
        let code = if c.is_ascii_alphabetic() {
            c.to_ascii_lowercase() & 0x1F
        } else {
            c
        };
        Self::new(KeyMask::CTRL, code)
    }

    pub fn up() -> Self {
        Self::new(KeyMask::UP, codes::UP)
    }

    pub fn down() -> Self {
        Self::new(KeyMask::DOWN, codes::DOWN)
    }

    pub fn left() -> Self {
        Self::new(KeyMask::LEFT, codes::LEFT)
    }

    pub fn right() -> Self {
        Self::new(KeyMask::RIGHT, codes::RIGHT)
    }

    pub fn enter() -> Self {
        Self::new(KeyMask::empty(), codes::ENTER)
    }

    pub fn esc() -> Self {
        Self::new(KeyMask::empty(), codes::ESC)
    }

    pub fn backspace() -> Self {
        Self::new(KeyMask::empty(), codes::BACKSPACE)
    }

    pub fn delete() -> Self {
        Self::new(KeyMask::empty(), codes::DELETE)
    }

    pub fn tab() -> Self {
        Self::new(KeyMask::empty(), codes::TAB)
    }

    /// Add modifier bits.
    pub fn with(mut self, extra: KeyMask) -> Self {
        self.mask |= extra;
        self
    }

    pub fn shift(self) -> Self {
        self.with(KeyMask::SHIFT)
    }

    pub fn arrow(&self) -> Option<KeyMask> {
        let a = self.mask & KeyMask::ARROWS;
        (!a.is_empty()).then_some(a)
    }
}

pub trait KeySource {
    /// Next pending key, if any. Never blocks for longer than the source's
    /// poll interval.
    fn poll(&mut self) -> Result<Option<RawKey>>;
}

/// Replays a fixed key sequence; used by tests and scripted sessions.
#[derive(Debug, Default, Clone)]
pub struct ScriptedKeys {
    keys: VecDeque<RawKey>,
}

impl ScriptedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unmodified key per byte; `\r` becomes Enter.
    pub fn typed(text: &str) -> Self {
        text.bytes()
            .map(|b| if b == b'\r' { RawKey::enter() } else { RawKey::byte(b) })
            .collect()
    }

    pub fn push(&mut self, key: RawKey) -> &mut Self {
        self.keys.push_back(key);
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl FromIterator<RawKey> for ScriptedKeys {
    fn from_iter<I: IntoIterator<Item = RawKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl KeySource for ScriptedKeys {
    fn poll(&mut self) -> Result<Option<RawKey>> {
        Ok(self.keys.pop_front())
    }
}
