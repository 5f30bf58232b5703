//! Fixed-capacity gap buffer.
//!
//! Storage layout is `[pre-gap text | gap | post-gap text]` inside a single
//! allocation made once at startup. The allocation never grows: when the gap
//! is exhausted inserts fail with [`BufferError::Full`] and the caller reports
//! it through the status line.
//!
//! Logical position `p` maps to physical index `p` when `p < gap_start`, else
//! `p + gap_len()`. Every read goes through [`GapBuffer::char_at`] or one of
//! the segment accessors; nothing outside this module sees the physical
//! layout.
//!
//! Moving the gap (`relocate_gap_to`) is the only operation that copies text.
//! Edits cluster around the cursor so the amortized cost per keystroke stays
//! O(1).

use thiserror::Error;
use tracing::trace;

/// Default storage size in bytes.
pub const BUF_SIZE: usize = 16 * 1024;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The gap is empty; no byte can be inserted until something is deleted.
    #[error("buffer full ({capacity} bytes)")]
    Full { capacity: usize },
    /// The backing storage could not be allocated.
    #[error("could not allocate {capacity} bytes of text storage")]
    Alloc { capacity: usize },
}

#[derive(Debug, Clone)]
pub struct GapBuffer {
    storage: Box<[u8]>,
    gap_start: usize,
    gap_end: usize,
}

impl GapBuffer {
    /// Allocate an empty buffer holding at most `capacity` bytes.
    ///
    /// Allocation failure is reported instead of aborting so the binary can
    /// exit with a readable error.
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::Alloc { capacity })?;
        storage.resize(capacity, 0u8);
        Ok(Self {
            storage: storage.into_boxed_slice(),
            gap_start: 0,
            gap_end: capacity,
        })
    }

    /// Convenience constructor used by tests and tools: a `capacity` buffer
    /// preloaded with `text` (truncated to fit).
    pub fn from_bytes(text: &[u8], capacity: usize) -> Result<Self, BufferError> {
        let mut buf = Self::with_capacity(capacity)?;
        let take = text.len().min(capacity);
        buf.storage[..take].copy_from_slice(&text[..take]);
        buf.gap_start = take;
        Ok(buf)
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of live bytes.
    pub fn len(&self) -> usize {
        self.storage.len() - self.gap_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.gap_start == self.gap_end
    }

    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    #[inline]
    fn physical(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        }
    }

    /// Byte at logical `pos`, or 0 when `pos` is out of range.
    #[inline]
    pub fn char_at(&self, pos: usize) -> u8 {
        if pos >= self.len() {
            return 0;
        }
        self.storage[self.physical(pos)]
    }

    /// Slide the gap so it starts at logical `target` (clamped to `len`).
    pub fn relocate_gap_to(&mut self, target: usize) {
        let target = target.min(self.len());
        if target < self.gap_start {
            let shift = self.gap_start - target;
            self.storage
                .copy_within(target..self.gap_start, self.gap_end - shift);
            self.gap_start = target;
            self.gap_end -= shift;
        } else if target > self.gap_start {
            let shift = target - self.gap_start;
            self.storage
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Insert `byte` at logical `pos`. The gap is left just after the new byte.
    pub fn insert_at(&mut self, pos: usize, byte: u8) -> Result<(), BufferError> {
        if self.is_full() {
            trace!(target: "text.gap", pos, capacity = self.capacity(), "insert_rejected_full");
            return Err(BufferError::Full {
                capacity: self.capacity(),
            });
        }
        self.relocate_gap_to(pos);
        self.storage[self.gap_start] = byte;
        self.gap_start += 1;
        Ok(())
    }

    /// Remove the byte immediately before logical `pos`; returns it, or
    /// `None` when `pos` is 0 or past the end.
    pub fn delete_before(&mut self, pos: usize) -> Option<u8> {
        if pos == 0 || pos > self.len() {
            return None;
        }
        self.relocate_gap_to(pos);
        self.gap_start -= 1;
        Some(self.storage[self.gap_start])
    }

    /// Remove the logical range `[start, end)` by widening the gap.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        self.relocate_gap_to(start);
        self.gap_end += end - start;
        trace!(target: "text.gap", start, end, len = self.len(), "delete_range");
    }

    /// Drop all text without reallocating.
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.storage.len();
    }

    /// Live text as the two contiguous slices around the gap.
    pub fn segments(&self) -> (&[u8], &[u8]) {
        (
            &self.storage[..self.gap_start],
            &self.storage[self.gap_end..],
        )
    }

    /// Logical range `[start, end)` as at most two contiguous slices.
    pub fn range_segments(&self, start: usize, end: usize) -> (&[u8], &[u8]) {
        let end = end.min(self.len());
        let start = start.min(end);
        if end <= self.gap_start {
            (&self.storage[start..end], &[])
        } else if start >= self.gap_start {
            let gap = self.gap_len();
            (&self.storage[start + gap..end + gap], &[])
        } else {
            (
                &self.storage[start..self.gap_start],
                &self.storage[self.gap_end..end + self.gap_len()],
            )
        }
    }

    /// Iterate the live bytes in logical order.
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        let (pre, post) = self.segments();
        pre.iter().chain(post.iter()).copied()
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let (pre, post) = self.segments();
        let mut out = Vec::with_capacity(pre.len() + post.len());
        out.extend_from_slice(pre);
        out.extend_from_slice(post);
        out
    }

    /// Position of the first occurrence of `needle` starting at or after `from`.
    pub fn find_forward(&self, needle: &[u8], from: usize) -> Option<usize> {
        let len = self.len();
        if needle.is_empty() || needle.len() > len {
            return None;
        }
        (from..=len - needle.len())
            .find(|&i| needle.iter().enumerate().all(|(k, &b)| self.char_at(i + k) == b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(text: &str) -> GapBuffer {
        GapBuffer::from_bytes(text.as_bytes(), 32).unwrap()
    }

    #[test]
    fn char_at_out_of_range_is_zero() {
        let b = buf("abc");
        assert_eq!(b.char_at(2), b'c');
        assert_eq!(b.char_at(3), 0);
        assert_eq!(b.char_at(usize::MAX), 0);
    }

    #[test]
    fn insert_relocates_gap_to_edit_point() {
        let mut b = buf("abd");
        b.insert_at(2, b'c').unwrap();
        assert_eq!(b.to_vec(), b"abcd");
        assert_eq!(b.gap_start(), 3);
        assert_eq!(b.len(), 4);
    }

    #[test]
    fn insert_fails_when_gap_empty() {
        let mut b = GapBuffer::from_bytes(b"ab", 2).unwrap();
        assert!(b.is_full());
        assert_eq!(
            b.insert_at(1, b'x'),
            Err(BufferError::Full { capacity: 2 })
        );
        assert_eq!(b.to_vec(), b"ab");
    }

    #[test]
    fn delete_before_returns_removed_byte() {
        let mut b = buf("hello");
        assert_eq!(b.delete_before(0), None);
        assert_eq!(b.delete_before(5), Some(b'o'));
        assert_eq!(b.delete_before(1), Some(b'h'));
        assert_eq!(b.to_vec(), b"ell");
    }

    #[test]
    fn range_segments_span_the_gap() {
        let mut b = buf("abcdef");
        b.relocate_gap_to(3);
        let (pre, post) = b.range_segments(1, 5);
        assert_eq!(pre, b"bc");
        assert_eq!(post, b"de");
        let (pre, post) = b.range_segments(4, 6);
        assert_eq!(pre, b"ef");
        assert!(post.is_empty());
    }

    #[test]
    fn delete_range_and_clear() {
        let mut b = buf("abcdef");
        b.delete_range(1, 4);
        assert_eq!(b.to_vec(), b"aef");
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 32);
    }

    #[test]
    fn find_forward_scans_across_gap() {
        let mut b = buf("the quick fox");
        b.relocate_gap_to(11);
        assert_eq!(b.find_forward(b"fox", 0), Some(10));
        assert_eq!(b.find_forward(b"fox", 11), None);
        assert_eq!(b.find_forward(b"", 0), None);
    }
}
