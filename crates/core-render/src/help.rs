//! Full-screen help overlay.
//!
//! Three layouts chosen by screen height: at least 60 rows shows the full
//! command table double-spaced, at least 40 rows shows it single-spaced and
//! anything smaller uses a compact two-column form with category labels
//! padded to column 9.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Header { full: &'static str, compact: &'static str },
    Command { full: &'static str, compact: &'static str },
    Blank,
}

use Entry::*;

const TABLE: &[Entry] = &[
    Header { full: "FILE OPERATIONS:", compact: "FILE:" },
    Command { full: "  ^S              Save file", compact: "^S=Save" },
    Command { full: "  ^Q              Quit (confirms if unsaved)", compact: "^Q=Quit" },
    Blank,
    Header { full: "EDITING:", compact: "EDIT:" },
    Command { full: "  ^Z              Undo (50 levels)", compact: "^Z=Undo" },
    Command { full: "  Backspace       Delete character before cursor", compact: "BS=Del<" },
    Command { full: "  Delete          Delete character at cursor", compact: "Del=Del>" },
    Command { full: "  Tab             Insert tab character", compact: "Tab=Tab" },
    Blank,
    Header { full: "SELECTION:", compact: "SELECT:" },
    Command { full: "  ^A              Select all", compact: "^A=All" },
    Command { full: "  Shift+Arrows    Select text", compact: "Shft+Arr=Sel" },
    Command { full: "  Shift+^Arrows   Select by word", compact: "Shft+^Arr=Word" },
    Command { full: "  ESC             Clear selection", compact: "ESC=Clear" },
    Blank,
    Header { full: "CLIPBOARD:", compact: "CLIP:" },
    Command { full: "  ^C              Copy selection", compact: "^C=Copy" },
    Command { full: "  ^X              Cut selection", compact: "^X=Cut" },
    Command { full: "  ^V              Paste from clipboard", compact: "^V=Paste" },
    Blank,
    Header { full: "SEARCH & NAVIGATION:", compact: "NAV:" },
    Command { full: "  ^F              Find text / Find next", compact: "^F=Find" },
    Command { full: "  ^G              Go to line number", compact: "^G=Goto" },
    Command { full: "  ^Arrows         Move by word", compact: "^Arr=Word" },
    Command { full: "  ^Up/Down        Page up/down", compact: "^Up/Dn=Page" },
    Blank,
    Header { full: "DISPLAY:", compact: "VIEW:" },
    Command { full: "  ^1              Single-spacing mode", compact: "^1=Single" },
    Command { full: "  ^2              Double-spacing mode", compact: "^2=Double" },
];

const COMPACT_LABEL_WIDTH: usize = 9;

/// One overlay row; `reverse` rows are drawn in reverse video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpLine {
    pub text: String,
    pub reverse: bool,
}

impl HelpLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reverse: false,
        }
    }

    fn reversed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reverse: true,
        }
    }
}

/// Overlay rows, top to bottom, starting at screen row 0.
pub fn help_lines(screen_rows: usize) -> Vec<HelpLine> {
    let mut lines = vec![HelpLine::plain("")];
    if screen_rows >= 40 {
        let double = screen_rows >= 60;
        lines.push(HelpLine::reversed("  te Text Editor - Help  "));
        lines.push(HelpLine::plain(""));
        for entry in TABLE {
            match entry {
                Header { full, .. } | Command { full, .. } => {
                    lines.push(HelpLine::plain(*full));
                    if double {
                        lines.push(HelpLine::plain(""));
                    }
                }
                Blank if !double => lines.push(HelpLine::plain("")),
                Blank => {}
            }
        }
        if !double {
            lines.push(HelpLine::plain(""));
        }
        lines.push(HelpLine::reversed("Press any key to return to editor"));
    } else {
        lines.push(HelpLine::reversed(" Help "));
        lines.push(HelpLine::plain(""));
        let width = COMPACT_LABEL_WIDTH;
        let mut first_in_category = false;
        for entry in TABLE {
            match entry {
                Header { compact, .. } => {
                    lines.push(HelpLine::plain(""));
                    lines.push(HelpLine::plain(format!("{compact:<width$}")));
                    first_in_category = true;
                }
                Command { compact, .. } => {
                    let same_row = first_in_category;
                    first_in_category = false;
                    match lines.last_mut() {
                        Some(label) if same_row => label.text.push_str(compact),
                        _ => lines.push(HelpLine::plain(format!("{:width$}{compact}", ""))),
                    }
                }
                Blank => {}
            }
        }
        lines.push(HelpLine::plain(""));
        lines.push(HelpLine::reversed("Any key=exit"));
    }
    lines
}
