//! Terminal backend abstraction and crossterm implementation.
//!
//! * `TerminalBackend` / `CrosstermBackend` - raw mode + alternate screen
//!   acquisition with an RAII guard so every exit path restores the terminal.
//! * `sink` - the renderer's output command set and its encoders.
//! * `CrosstermSink` - maps output commands onto ANSI via `crossterm::queue!`.
//! * `geometry` - one-shot screen size query.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
        disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Write, stdout};

pub mod geometry;
pub mod sink;

pub use geometry::ScreenGeometry;
pub use sink::{MemorySink, OutputSink, ProtocolSink, TermCommand};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
            tracing::debug!(target: "terminal", "raw_mode_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "terminal", "raw_mode_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

/// Best-effort terminal restore for panic hooks, where no backend handle is
/// reachable.
pub fn emergency_restore() {
    let _ = execute!(stdout(), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

/// Output sink rendering commands as ANSI sequences through crossterm.
pub struct CrosstermSink<W: Write> {
    out: W,
}

impl CrosstermSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: stdout() }
    }
}

impl<W: Write> CrosstermSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for CrosstermSink<W> {
    fn send(&mut self, cmd: &TermCommand) -> Result<()> {
        match cmd {
            TermCommand::HideCursor => queue!(self.out, Hide)?,
            TermCommand::ShowCursor => queue!(self.out, Show)?,
            TermCommand::ReverseOn => queue!(self.out, SetAttribute(Attribute::Reverse))?,
            TermCommand::ReverseOff => queue!(self.out, SetAttribute(Attribute::NoReverse))?,
            TermCommand::ClearEol => queue!(self.out, Clear(ClearType::UntilNewLine))?,
            TermCommand::EraseLine => queue!(self.out, Clear(ClearType::CurrentLine))?,
            TermCommand::ClearScreen => queue!(self.out, Clear(ClearType::All))?,
            TermCommand::Home => queue!(self.out, MoveTo(0, 0))?,
            TermCommand::MoveTo { col, row } => queue!(self.out, MoveTo(*col, *row))?,
            TermCommand::Text(bytes) => {
                queue!(self.out, Print(String::from_utf8_lossy(bytes)))?
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
