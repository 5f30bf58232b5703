//! Configuration loading and parsing.
//!
//! Parses `te.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [editor]
//! tab_width = 8
//! double_spacing = false
//! enter = "cr"
//!
//! [buffer]
//! capacity = 16384
//! undo_depth = 50
//!
//! [clipboard]
//! enabled = true
//! capacity = 8192
//! ```
//!
//! Every field is optional. Unknown fields are ignored; a file that fails to
//! parse logs a warning and falls back to defaults. The tab width depends on
//! the screen, so the raw value is kept and the effective one computed by
//! [`Config::apply_context`].

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "te.toml";
/// Upper bound on the tab width regardless of screen width.
pub const MAX_TAB_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub screen_cols: u16,
    pub screen_rows: u16,
}

impl ConfigContext {
    pub fn new(screen_cols: u16, screen_rows: u16) -> Self {
        Self {
            screen_cols,
            screen_rows,
        }
    }

    /// Largest tab width the screen can display.
    pub fn max_tab_width(&self) -> usize {
        MAX_TAB_WIDTH.min(usize::from(self.screen_cols)).max(1)
    }
}

/// Terminator inserted by Enter.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnterTerminator {
    #[default]
    Cr,
    Lf,
}

impl EnterTerminator {
    pub fn byte(self) -> u8 {
        match self {
            EnterTerminator::Cr => b'\r',
            EnterTerminator::Lf => b'\n',
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EditorConfig {
    pub tab_width: usize,
    pub double_spacing: bool,
    pub enter: EnterTerminator,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: 8,
            double_spacing: false,
            enter: EnterTerminator::Cr,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BufferConfig {
    pub capacity: usize,
    pub undo_depth: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: 16 * 1024,
            undo_depth: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClipboardConfig {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 8 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub buffer: BufferConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    /// Tab width after clamping against the screen.
    pub effective_tab_width: usize,
}

/// Local `te.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("te").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
            effective_tab_width: 0,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp the tab width to `1..=min(16, screen_cols)`. Returns the
    /// effective value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> usize {
        let raw = self.file.editor.tab_width;
        let max = ctx.max_tab_width();
        let clamped = raw.clamp(1, max);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                screen_cols = ctx.screen_cols,
                screen_rows = ctx.screen_rows,
                "tab_width_clamped"
            );
        }
        self.effective_tab_width = clamped;
        clamped
    }

    /// Text storage size; at least 2 bytes so a load can keep one free.
    pub fn buffer_capacity(&self) -> usize {
        self.file.buffer.capacity.max(2)
    }

    pub fn undo_depth(&self) -> usize {
        self.file.buffer.undo_depth.max(1)
    }

    pub fn enter_terminator(&self) -> u8 {
        self.file.editor.enter.byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let out = buffer.lock().unwrap().clone();
        String::from_utf8(out).unwrap()
    }

    fn load_str(toml: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), toml).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn defaults_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.file.editor.tab_width, 8);
        assert_eq!(cfg.buffer_capacity(), 16384);
        assert_eq!(cfg.undo_depth(), 50);
        assert!(cfg.file.clipboard.enabled);
        assert_eq!(cfg.enter_terminator(), b'\r');
    }

    #[test]
    fn parses_all_sections() {
        let cfg = load_str(
            "[editor]\ntab_width = 4\ndouble_spacing = true\nenter = \"lf\"\n\
             [buffer]\ncapacity = 4096\nundo_depth = 10\n\
             [clipboard]\nenabled = false\ncapacity = 1024\n",
        );
        assert_eq!(cfg.file.editor.tab_width, 4);
        assert!(cfg.file.editor.double_spacing);
        assert_eq!(cfg.enter_terminator(), b'\n');
        assert_eq!(cfg.buffer_capacity(), 4096);
        assert_eq!(cfg.undo_depth(), 10);
        assert!(!cfg.file.clipboard.enabled);
        assert_eq!(cfg.file.clipboard.capacity, 1024);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = load_str("[editor]\ndouble_spacing = true\nunknown_key = 1\n");
        assert_eq!(cfg.file.editor.tab_width, 8);
        assert!(cfg.file.editor.double_spacing);
        assert_eq!(cfg.file.buffer, BufferConfig::default());
    }

    #[test]
    fn parse_error_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\ntab_width = ").unwrap();
        let path = tmp.path().to_path_buf();
        let mut cfg = None;
        let log = capture(|| cfg = Some(load_from(Some(path)).unwrap()));
        assert_eq!(cfg.unwrap().file, ConfigFile::default());
        assert!(log.contains("WARN config:"));
        assert!(log.contains("config_parse_failed"));
    }

    #[test]
    fn zero_depth_and_capacity_are_raised() {
        let cfg = load_str("[buffer]\ncapacity = 0\nundo_depth = 0\n");
        assert_eq!(cfg.buffer_capacity(), 2);
        assert_eq!(cfg.undo_depth(), 1);
    }

    #[test]
    fn tab_width_within_bounds_is_kept() {
        let mut cfg = load_str("[editor]\ntab_width = 4\n");
        assert_eq!(cfg.apply_context(ConfigContext::new(80, 24)), 4);
        assert_eq!(cfg.effective_tab_width, 4);
    }

    #[test]
    fn tab_width_clamp_logs_under_config_target() {
        let mut cfg = load_str("[editor]\ntab_width = 40\n");
        let log = capture(|| {
            cfg.apply_context(ConfigContext::new(80, 24));
        });
        assert_eq!(cfg.effective_tab_width, 16);
        assert!(log.contains("INFO config:"));
        assert!(log.contains("tab_width_clamped"));
    }

    #[test]
    fn narrow_screens_and_zero_width_clamp() {
        let mut cfg = load_str("[editor]\ntab_width = 12\n");
        assert_eq!(cfg.apply_context(ConfigContext::new(10, 24)), 10);
        let mut zero = load_str("[editor]\ntab_width = 0\n");
        assert_eq!(zero.apply_context(ConfigContext::new(80, 24)), 1);
    }
}
