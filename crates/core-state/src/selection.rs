//! Selection model.
//!
//! A selection is an anchor (the fixed end) plus a half-open span
//! `[start, end)` recomputed from `(anchor, cursor)` after every extending
//! motion. A zero-length span never exists: moving the cursor back onto the
//! anchor drops the selection entirely.

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
    pub start: usize,
    pub end: usize,
}

impl SelectionSpan {
    /// Normalize two endpoints; `None` when they coincide.
    pub fn between(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { start: a, end: b }),
            std::cmp::Ordering::Greater => Some(Self { start: b, end: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    anchor: Option<usize>,
    span: Option<SelectionSpan>,
}

/// Outcome of recomputing the span after an extending motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Active(SelectionSpan),
    /// Cursor returned to the anchor.
    Collapsed,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        self.span.is_some()
    }

    pub fn span(&self) -> Option<SelectionSpan> {
        self.span
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    /// Fix the anchor at `at` unless an extension is already in progress.
    pub fn begin(&mut self, at: usize) {
        if self.anchor.is_none() {
            self.anchor = Some(at);
            trace!(target: "state.selection", anchor = at, "selection_begin");
        }
    }

    /// Recompute the span from the anchor and the new cursor position.
    pub fn extend_to(&mut self, cursor: usize) -> SelectionChange {
        let anchor = *self.anchor.get_or_insert(cursor);
        match SelectionSpan::between(anchor, cursor) {
            Some(span) => {
                self.span = Some(span);
                SelectionChange::Active(span)
            }
            None => {
                self.clear();
                SelectionChange::Collapsed
            }
        }
    }

    /// Install an explicit selection (select all, search match).
    pub fn select(&mut self, anchor: usize, start: usize, end: usize) {
        self.anchor = Some(anchor);
        self.span = SelectionSpan::between(start, end);
        if self.span.is_none() {
            self.anchor = None;
        }
    }

    pub fn clear(&mut self) {
        if self.anchor.is_some() || self.span.is_some() {
            trace!(target: "state.selection", "selection_cleared");
        }
        self.anchor = None;
        self.span = None;
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.span.is_some_and(|s| s.contains(pos))
    }
}
