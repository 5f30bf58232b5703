//! BatchWriter
//!
//! Groups consecutive printable bytes into a single `Text` command so a run
//! of plain characters reaches the sink as one write instead of one command
//! per cell.
//!
//! Batching rules:
//! * Bytes pushed with [`BatchWriter::byte`], [`BatchWriter::text`] or
//!   [`BatchWriter::spaces`] accumulate in the pending run.
//! * Any other command (movement, clearing, reverse video, cursor
//!   visibility) flushes the pending run first, preserving order.
//!
//! Metrics:
//! * `text_commands` - `Text` commands issued after batching.
//! * `cells_printed` - bytes written through the batch. Always
//!   `text_commands <= cells_printed`.

use anyhow::Result;
use core_terminal::{OutputSink, TermCommand};

pub struct BatchWriter<'a> {
    sink: &'a mut dyn OutputSink,
    pending: Vec<u8>,
    pub text_commands: u64,
    pub cells_printed: u64,
}

impl<'a> BatchWriter<'a> {
    pub fn new(sink: &'a mut dyn OutputSink) -> Self {
        Self {
            sink,
            pending: Vec::with_capacity(128),
            text_commands: 0,
            cells_printed: 0,
        }
    }

    fn flush_pending(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let run = std::mem::take(&mut self.pending);
        self.sink.send(&TermCommand::Text(run))?;
        self.text_commands += 1;
        Ok(())
    }

    pub fn command(&mut self, cmd: TermCommand) -> Result<()> {
        self.flush_pending()?;
        self.sink.send(&cmd)
    }

    pub fn move_to(&mut self, col: usize, row: usize) -> Result<()> {
        self.command(TermCommand::MoveTo {
            col: col as u16,
            row: row as u16,
        })
    }

    pub fn byte(&mut self, b: u8) {
        self.pending.push(b);
        self.cells_printed += 1;
    }

    pub fn text(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        self.cells_printed += bytes.len() as u64;
    }

    pub fn spaces(&mut self, n: usize) {
        self.pending.extend(std::iter::repeat_n(b' ', n));
        self.cells_printed += n as u64;
    }

    /// Emit the pending run and flush the sink. Returns
    /// `(text_commands, cells_printed)`.
    pub fn finish(mut self) -> Result<(u64, u64)> {
        self.flush_pending()?;
        self.sink.flush()?;
        Ok((self.text_commands, self.cells_printed))
    }
}
