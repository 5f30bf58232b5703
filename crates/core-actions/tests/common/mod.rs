#![allow(dead_code)] // Shared across integration tests; each binary uses a subset.

use core_actions::{DispatchResult, dispatch_key};
use core_input::{KeySource, RawKey, ScriptedKeys};
use core_state::{BlockClipboard, EditorState, ViewState};
use core_text::GapBuffer;

pub const CAPACITY: usize = 16 * 1024;

/// Editor state plus clipboard, driven one key at a time like the main loop.
pub struct Session {
    pub state: EditorState,
    pub clipboard: BlockClipboard,
    pub quit: bool,
}

impl Session {
    pub fn new(text: &str) -> Self {
        Self::with_screen(text, 80, 24)
    }

    pub fn with_screen(text: &str, cols: usize, rows: usize) -> Self {
        let buf = GapBuffer::from_bytes(text.as_bytes(), CAPACITY).unwrap();
        Self {
            state: EditorState::new(buf, ViewState::new(cols, rows, 8), 50),
            clipboard: BlockClipboard::acquire(8 * 1024).unwrap(),
            quit: false,
        }
    }

    pub fn key(&mut self, key: RawKey) -> DispatchResult {
        let r = dispatch_key(key, &mut self.state, &mut self.clipboard);
        self.quit |= r.quit;
        r
    }

    /// Feed every scripted key, stopping early on quit.
    pub fn run(&mut self, mut keys: ScriptedKeys) {
        while let Some(key) = keys.poll().unwrap() {
            self.key(key);
            if self.quit {
                break;
            }
        }
    }

    pub fn typed(&mut self, text: &str) {
        self.run(ScriptedKeys::typed(text));
    }

    pub fn text(&self) -> Vec<u8> {
        self.state.buffer.to_vec()
    }

    pub fn status(&mut self) -> Option<String> {
        self.state.status.take()
    }
}
