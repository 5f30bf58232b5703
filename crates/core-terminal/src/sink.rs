//! Output sink abstraction.
//!
//! The renderer speaks a tiny command vocabulary: cursor visibility,
//! reverse video, three kinds of clearing, home, absolute positioning and
//! raw text. Sinks translate it to a concrete wire format:
//!
//! * [`ProtocolSink`] - the native single/multi-byte control protocol.
//! * [`crate::CrosstermSink`] - ANSI sequences via crossterm.
//! * [`MemorySink`] - records commands for tests.
//!
//! Invariants:
//! * Commands preserve ordering; nothing reaches the device before `flush`
//!   for buffered sinks.
//! * Positions are absolute and 0-based; the caller keeps them on screen.

use anyhow::Result;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermCommand {
    HideCursor,
    ShowCursor,
    ReverseOn,
    ReverseOff,
    /// Clear from the cursor to the end of the line.
    ClearEol,
    /// Erase the whole line the cursor is on.
    EraseLine,
    ClearScreen,
    Home,
    MoveTo { col: u16, row: u16 },
    /// Raw bytes; the renderer only emits printable ASCII here.
    Text(Vec<u8>),
}

pub trait OutputSink {
    fn send(&mut self, cmd: &TermCommand) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

/// Native control protocol: 1-3 byte sequences with a 0x20 bias on
/// position arguments.
pub mod protocol {
    pub const HOME: u8 = 0x01;
    pub const MOVE_TO: u8 = 0x02;
    pub const ERASE_LINE: u8 = 0x03;
    pub const CLEAR_EOL: u8 = 0x04;
    pub const CURSOR: u8 = 0x05;
    pub const CLEAR_SCREEN: u8 = 0x0C;
    pub const REVERSE: u8 = 0x1F;
    pub const ON: u8 = 0x20;
    pub const OFF: u8 = 0x21;
    pub const BIAS: u8 = 0x20;
}

/// Encode one command in the native protocol, appending to `out`.
pub fn encode(cmd: &TermCommand, out: &mut Vec<u8>) {
    use protocol::*;
    match cmd {
        TermCommand::HideCursor => out.extend_from_slice(&[CURSOR, ON]),
        TermCommand::ShowCursor => out.extend_from_slice(&[CURSOR, OFF]),
        TermCommand::ReverseOn => out.extend_from_slice(&[REVERSE, ON]),
        TermCommand::ReverseOff => out.extend_from_slice(&[REVERSE, OFF]),
        TermCommand::ClearEol => out.push(CLEAR_EOL),
        TermCommand::EraseLine => out.push(ERASE_LINE),
        TermCommand::ClearScreen => out.push(CLEAR_SCREEN),
        TermCommand::Home => out.push(HOME),
        TermCommand::MoveTo { col, row } => out.extend_from_slice(&[
            MOVE_TO,
            (*col as u8).wrapping_add(BIAS),
            (*row as u8).wrapping_add(BIAS),
        ]),
        TermCommand::Text(bytes) => out.extend_from_slice(bytes),
    }
}

/// Writes the native protocol to any byte writer, buffering until `flush`.
pub struct ProtocolSink<W: Write> {
    out: W,
    pending: Vec<u8>,
}

impl<W: Write> ProtocolSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            pending: Vec::with_capacity(256),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for ProtocolSink<W> {
    fn send(&mut self, cmd: &TermCommand) -> Result<()> {
        encode(cmd, &mut self.pending);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.pending)?;
        self.pending.clear();
        self.out.flush()?;
        Ok(())
    }
}

/// Records commands in order. `flushes` counts frame boundaries.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub commands: Vec<TermCommand>,
    pub flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenated text payloads.
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self
            .commands
            .iter()
            .filter_map(|c| match c {
                TermCommand::Text(t) => Some(t.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Native protocol bytes for everything recorded.
    pub fn encoded(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for c in &self.commands {
            encode(c, &mut out);
        }
        out
    }

    pub fn count(&self, pred: impl Fn(&TermCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.flushes = 0;
    }
}

impl OutputSink for MemorySink {
    fn send(&mut self, cmd: &TermCommand) -> Result<()> {
        self.commands.push(cmd.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
