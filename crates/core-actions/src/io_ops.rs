//! File IO helpers.
//!
//! Loading fills the buffer up to one byte short of capacity and reports any
//! truncation. Saving streams the pre-gap then post-gap segments straight to
//! disk without building a contiguous copy. Neither operation returns an
//! error to the caller: failures are logged and surfaced as status text,
//! leaving the buffer untouched.

use core_state::EditorState;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// What happened when opening a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The whole file was loaded.
    Loaded { bytes: usize },
    /// The file was longer than the buffer allows; only `bytes` were kept.
    Truncated { bytes: usize },
    /// No such file: the name is kept and the empty buffer counts as modified.
    NewFile,
    /// The file exists but could not be read; state is unchanged.
    Failed,
}

fn read_limited(path: &Path, limit: usize) -> io::Result<(Vec<u8>, bool)> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file).take(limit as u64 + 1);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let truncated = bytes.len() > limit;
    bytes.truncate(limit);
    Ok((bytes, truncated))
}

/// Load `path` into the buffer, replacing its contents.
pub fn open_file(state: &mut EditorState, path: &Path) -> OpenOutcome {
    let limit = state.buffer.capacity().saturating_sub(1);
    match read_limited(path, limit) {
        Ok((bytes, truncated)) => {
            let loaded = state.replace_text(&bytes);
            state.file_name = path.to_path_buf();
            state.set_dirty(false);
            tracing::info!(target: "io", bytes = loaded, truncated, "file_loaded");
            if truncated {
                state.set_status(format!("File truncated at {loaded} bytes"));
                OpenOutcome::Truncated { bytes: loaded }
            } else {
                OpenOutcome::Loaded { bytes: loaded }
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(target: "io", "file_new");
            state.file_name = path.to_path_buf();
            state.set_dirty(true);
            state.set_status("New file");
            OpenOutcome::NewFile
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_open_error");
            state.set_status("Could not open file");
            OpenOutcome::Failed
        }
    }
}

fn write_segments(path: &Path, head: &[u8], tail: &[u8]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(head)?;
    out.write_all(tail)?;
    out.flush()
}

/// Write the buffer to `state.file_name`. Returns the byte count on success.
pub fn save_file(state: &mut EditorState) -> Option<usize> {
    let (head, tail) = state.buffer.segments();
    let len = head.len() + tail.len();
    match write_segments(&state.file_name, head, tail) {
        Ok(()) => {
            tracing::info!(target: "io", bytes = len, "file_saved");
            state.set_dirty(false);
            state.set_status(format!("Saved {len} bytes"));
            Some(len)
        }
        Err(e) => {
            tracing::error!(target: "io", ?e, "file_write_error");
            state.set_status("Could not save file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{RenderRequest, ViewState};
    use core_text::GapBuffer;

    fn state(capacity: usize) -> EditorState {
        let buf = GapBuffer::with_capacity(capacity).unwrap();
        EditorState::new(buf, ViewState::new(40, 10, 4), 50)
    }

    #[test]
    fn open_file_loads_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        std::fs::write(&path, b"line1\r\nline2\nline3").unwrap();
        let mut s = state(64);
        s.set_dirty(true);
        assert_eq!(open_file(&mut s, &path), OpenOutcome::Loaded { bytes: 19 });
        assert_eq!(s.buffer.to_vec(), b"line1\r\nline2\nline3");
        assert_eq!(s.total_lines, 4, "CR and LF each end a line");
        assert_eq!(s.cursor.pos, 0);
        assert!(!s.dirty);
        assert_eq!(s.file_name, path);
        assert_eq!(s.render.take().unwrap().request, RenderRequest::Full);
    }

    #[test]
    fn open_file_truncates_one_short_of_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'x'; 40]).unwrap();
        let mut s = state(16);
        assert_eq!(open_file(&mut s, &path), OpenOutcome::Truncated { bytes: 15 });
        assert_eq!(s.len(), 15);
        assert_eq!(s.status.peek(), Some("File truncated at 15 bytes"));
    }

    #[test]
    fn missing_file_is_new_and_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.txt");
        let mut s = state(16);
        assert_eq!(open_file(&mut s, &path), OpenOutcome::NewFile);
        assert!(s.dirty);
        assert!(s.is_empty());
        assert_eq!(s.file_name, path);
        assert_eq!(s.status.peek(), Some("New file"));
    }

    #[test]
    fn unreadable_path_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = state(16);
        s.insert_byte(b'a').unwrap();
        // A directory opens but cannot be read as a file.
        let outcome = open_file(&mut s, dir.path());
        assert_eq!(outcome, OpenOutcome::Failed);
        assert_eq!(s.buffer.to_vec(), b"a");
        assert_eq!(s.status.peek(), Some("Could not open file"));
    }

    #[test]
    fn save_streams_both_segments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut s = state(64);
        for &b in b"hello world" {
            s.insert_byte(b).unwrap();
        }
        // Move the gap into the middle before saving.
        s.set_cursor(5);
        s.insert_byte(b',').unwrap();
        s.file_name = path.clone();
        assert_eq!(save_file(&mut s), Some(12));
        assert!(!s.dirty);
        assert_eq!(s.status.peek(), Some("Saved 12 bytes"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello, world");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.txt");
        let text = b"a\tb\r\nc\n\nd";
        let mut s = state(64);
        for &b in text {
            s.insert_byte(b).unwrap();
        }
        s.file_name = path.clone();
        save_file(&mut s);
        let mut t = state(64);
        open_file(&mut t, &path);
        assert_eq!(t.buffer.to_vec(), text);
    }

    #[test]
    fn save_failure_reports_and_stays_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = state(16);
        s.insert_byte(b'a').unwrap();
        s.file_name = dir.path().join("missing").join("out.txt");
        assert_eq!(save_file(&mut s), None);
        assert!(s.dirty);
        assert_eq!(s.status.peek(), Some("Could not save file"));
    }
}
