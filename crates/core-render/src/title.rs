//! Title bar: `----| name* |--------`, centred on the file name and filled
//! to the screen width.

use std::path::Path;

const FILL: u8 = b'-';

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

pub fn title_line(name: &str, dirty: bool, cols: usize) -> Vec<u8> {
    let lead = (cols.saturating_sub(name.len()) / 2).saturating_sub(2);
    let mut line = Vec::with_capacity(cols.max(name.len() + 8));
    line.extend(std::iter::repeat_n(FILL, lead));
    line.extend_from_slice(b"| ");
    line.extend_from_slice(name.as_bytes());
    if dirty {
        line.push(b'*');
    }
    line.extend_from_slice(b" |");
    if line.len() < cols {
        line.resize(cols, FILL);
    }
    line.truncate(cols);
    line
}
