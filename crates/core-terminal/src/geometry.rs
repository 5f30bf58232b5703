//! Screen geometry probe.
//!
//! Queried once at startup; the editor does not follow size changes while
//! running. When the query fails (no tty, unsupported platform) the
//! fallback geometry is used.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenGeometry {
    pub cols: u16,
    pub rows: u16,
}

impl ScreenGeometry {
    pub const FALLBACK: ScreenGeometry = ScreenGeometry { cols: 80, rows: 60 };
    /// Smallest usable screen: title, one text row, status and help rows.
    pub const MIN_ROWS: u16 = 4;
    pub const MIN_COLS: u16 = 16;

    pub fn detect() -> Self {
        match crossterm::terminal::size() {
            Ok((cols, rows)) => Self::clamped(cols, rows),
            Err(e) => {
                tracing::warn!(target: "terminal", ?e, "screen_size_query_failed");
                Self::FALLBACK
            }
        }
    }

    pub fn clamped(cols: u16, rows: u16) -> Self {
        Self {
            cols: cols.max(Self::MIN_COLS),
            rows: rows.max(Self::MIN_ROWS),
        }
    }
}
