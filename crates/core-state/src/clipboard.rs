//! Clipboard capability.
//!
//! The editor only needs a fixed-size byte block it can fill from a
//! selection and read back on paste. [`BlockClipboard`] owns one such block,
//! acquired at startup and released on every exit path (explicitly through
//! [`ClipboardService::release`] or on drop).

use thiserror::Error;
use tracing::{debug, warn};

/// Default block size in bytes.
pub const CLIPBOARD_SIZE: usize = 8 * 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("no clipboard available")]
    Unavailable,
    #[error("selection too large ({len} chars, max {max})")]
    TooLarge { len: usize, max: usize },
    #[error("clipboard empty")]
    Empty,
    #[error("could not allocate {capacity} byte clipboard block")]
    Alloc { capacity: usize },
}

pub trait ClipboardService {
    fn is_available(&self) -> bool;
    fn capacity(&self) -> usize;
    /// Replace the contents with `head` followed by `tail` (a selection may
    /// straddle the gap). Returns the number of bytes stored.
    fn copy(&mut self, head: &[u8], tail: &[u8]) -> Result<usize, ClipboardError>;
    fn paste(&self) -> Result<Vec<u8>, ClipboardError>;
    /// Give the block back. Later calls report `Unavailable`.
    fn release(&mut self);
}

#[derive(Debug)]
pub struct BlockClipboard {
    block: Option<Box<[u8]>>,
    len: usize,
    capacity: usize,
}

impl BlockClipboard {
    /// Acquire a block of `capacity` bytes.
    pub fn acquire(capacity: usize) -> Result<Self, ClipboardError> {
        let mut block = Vec::new();
        block
            .try_reserve_exact(capacity)
            .map_err(|_| ClipboardError::Alloc { capacity })?;
        block.resize(capacity, 0u8);
        debug!(target: "state.clipboard", capacity, "clipboard_acquired");
        Ok(Self {
            block: Some(block.into_boxed_slice()),
            len: 0,
            capacity,
        })
    }

    /// A clipboard that never holds anything; every call reports `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            block: None,
            len: 0,
            capacity: 0,
        }
    }
}

impl ClipboardService for BlockClipboard {
    fn is_available(&self) -> bool {
        self.block.is_some()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn copy(&mut self, head: &[u8], tail: &[u8]) -> Result<usize, ClipboardError> {
        let capacity = self.capacity;
        let block = self.block.as_mut().ok_or(ClipboardError::Unavailable)?;
        let len = head.len() + tail.len();
        if len > capacity {
            warn!(target: "state.clipboard", len, capacity, "clipboard_copy_too_large");
            return Err(ClipboardError::TooLarge { len, max: capacity });
        }
        block[..head.len()].copy_from_slice(head);
        block[head.len()..len].copy_from_slice(tail);
        self.len = len;
        debug!(target: "state.clipboard", len, "clipboard_copy");
        Ok(len)
    }

    fn paste(&self) -> Result<Vec<u8>, ClipboardError> {
        let block = self.block.as_ref().ok_or(ClipboardError::Unavailable)?;
        if self.len == 0 {
            return Err(ClipboardError::Empty);
        }
        Ok(block[..self.len].to_vec())
    }

    fn release(&mut self) {
        if self.block.take().is_some() {
            debug!(target: "state.clipboard", "clipboard_released");
        }
        self.len = 0;
    }
}

impl Drop for BlockClipboard {
    fn drop(&mut self) {
        self.release();
    }
}
