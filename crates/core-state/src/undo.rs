use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Default number of entries retained in the undo log.
pub const MAX_UNDO: usize = 50;

/// Which single-byte mutation an entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoAction {
    /// `byte` was inserted at `pos`; undo deletes it.
    Insert,
    /// `byte` was removed from `pos`; undo re-inserts it there.
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoEntry {
    pub pos: usize,
    pub action: UndoAction,
    pub byte: u8,
}

impl UndoEntry {
    pub fn insert(pos: usize, byte: u8) -> Self {
        Self {
            pos,
            action: UndoAction::Insert,
            byte,
        }
    }

    pub fn delete(pos: usize, byte: u8) -> Self {
        Self {
            pos,
            action: UndoAction::Delete,
            byte,
        }
    }
}

/// Bounded ring of single-byte edits.
///
/// `head` indexes the oldest entry and `len` counts live entries; the slot
/// after the newest is `(head + len) % capacity`. When full, a push
/// overwrites the oldest entry and advances `head`, so eviction is O(1).
#[derive(Debug)]
pub struct UndoLog {
    slots: Box<[UndoEntry]>,
    head: usize,
    len: usize,
    evicted: AtomicU64,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(MAX_UNDO)
    }
}

impl UndoLog {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            slots: vec![UndoEntry::insert(0, 0); depth].into_boxed_slice(),
            head: 0,
            len: 0,
            evicted: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries dropped to make room since creation.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    pub fn push(&mut self, entry: UndoEntry) {
        let cap = self.slots.len();
        if self.len < cap {
            self.slots[(self.head + self.len) % cap] = entry;
            self.len += 1;
        } else {
            self.slots[self.head] = entry;
            self.head = (self.head + 1) % cap;
            self.evicted.fetch_add(1, Ordering::Relaxed);
            trace!(target: "state.undo", capacity = cap, "undo_oldest_evicted");
        }
        trace!(target: "state.undo", depth = self.len, pos = entry.pos, action = ?entry.action, "undo_push");
    }

    /// The most recent entry, left in place.
    pub fn last(&self) -> Option<UndoEntry> {
        if self.len == 0 {
            return None;
        }
        Some(self.slots[(self.head + self.len - 1) % self.slots.len()])
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let entry = self.slots[(self.head + self.len) % self.slots.len()];
        trace!(target: "state.undo", depth = self.len, pos = entry.pos, action = ?entry.action, "undo_pop");
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
        trace!(target: "state.undo", "undo_cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_lifo_order() {
        let mut log = UndoLog::new(4);
        log.push(UndoEntry::insert(0, b'a'));
        log.push(UndoEntry::insert(1, b'b'));
        assert_eq!(log.pop(), Some(UndoEntry::insert(1, b'b')));
        assert_eq!(log.pop(), Some(UndoEntry::insert(0, b'a')));
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn full_log_evicts_oldest() {
        let mut log = UndoLog::new(3);
        for i in 0..5 {
            log.push(UndoEntry::delete(i, b'x'));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.evicted(), 2);
        let order: Vec<usize> = std::iter::from_fn(|| log.pop()).map(|e| e.pos).collect();
        assert_eq!(order, vec![4, 3, 2]);
    }

    #[test]
    fn wraps_after_partial_drain() {
        let mut log = UndoLog::new(2);
        log.push(UndoEntry::insert(0, b'a'));
        log.push(UndoEntry::insert(1, b'b'));
        log.push(UndoEntry::insert(2, b'c'));
        assert_eq!(log.pop().map(|e| e.pos), Some(2));
        log.push(UndoEntry::insert(9, b'z'));
        assert_eq!(log.pop().map(|e| e.pos), Some(9));
        assert_eq!(log.pop().map(|e| e.pos), Some(1));
        assert!(log.is_empty());
    }

    #[test]
    fn last_peeks_without_removing() {
        let mut log = UndoLog::new(2);
        assert_eq!(log.last(), None);
        log.push(UndoEntry::insert(0, b'a'));
        log.push(UndoEntry::insert(1, b'b'));
        log.push(UndoEntry::insert(2, b'c'));
        assert_eq!(log.last().map(|e| e.pos), Some(2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.pop().map(|e| e.pos), Some(2));
        assert_eq!(log.last().map(|e| e.pos), Some(1));
    }

    #[test]
    fn default_depth_matches_constant() {
        assert_eq!(UndoLog::default().capacity(), MAX_UNDO);
    }
}
