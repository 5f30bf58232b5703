//! Pending render request recorded by edit and motion handlers.
//!
//! Each keystroke settles on exactly one [`RenderRequest`] which the render
//! scheduler consumes once. Status-line and title-bar repaints are separate
//! additive flags since they never conflict with the text update class.
//!
//! When two text update classes are requested during one keystroke the one
//! that repaints a superset wins: `Full` > `DownFrom` > `MinimalFrom` >
//! `CharFrom` > `CursorOnly`. Positions of the same class merge to the
//! smaller one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRequest {
    /// Title, whole text window, status line and cursor.
    Full,
    /// From a position near the cursor to the end of its logical line,
    /// located without scanning from the top of the window.
    CharFrom(usize),
    /// From a position to the bottom of the text window.
    DownFrom(usize),
    /// From a position to the end of its logical line.
    MinimalFrom(usize),
    /// Only reposition the cursor.
    CursorOnly,
}

impl RenderRequest {
    fn rank(&self) -> u8 {
        match self {
            RenderRequest::Full => 4,
            RenderRequest::DownFrom(_) => 3,
            RenderRequest::MinimalFrom(_) => 2,
            RenderRequest::CharFrom(_) => 1,
            RenderRequest::CursorOnly => 0,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            RenderRequest::CharFrom(p)
            | RenderRequest::DownFrom(p)
            | RenderRequest::MinimalFrom(p) => Some(*p),
            RenderRequest::Full | RenderRequest::CursorOnly => None,
        }
    }

    fn with_position(self, pos: usize) -> Self {
        match self {
            RenderRequest::CharFrom(_) => RenderRequest::CharFrom(pos),
            RenderRequest::DownFrom(_) => RenderRequest::DownFrom(pos),
            RenderRequest::MinimalFrom(_) => RenderRequest::MinimalFrom(pos),
            other => other,
        }
    }

    /// Combine two requests made during the same keystroke.
    pub fn merge(self, other: RenderRequest) -> RenderRequest {
        let (hi, lo) = if self.rank() >= other.rank() {
            (self, other)
        } else {
            (other, self)
        };
        match (hi.position(), lo.position()) {
            (Some(a), Some(b)) => hi.with_position(a.min(b)),
            _ => hi,
        }
    }
}

/// One frame's worth of pending repaint work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingFrame {
    pub request: RenderRequest,
    pub status: bool,
    pub title: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingRender {
    request: Option<RenderRequest>,
    status: bool,
    title: bool,
}

impl PendingRender {
    pub fn request(&mut self, req: RenderRequest) {
        self.request = Some(match self.request {
            Some(existing) => existing.merge(req),
            None => req,
        });
    }

    pub fn mark_status(&mut self) {
        self.status = true;
    }

    pub fn mark_title(&mut self) {
        self.title = true;
    }

    pub fn peek(&self) -> Option<RenderRequest> {
        self.request
    }

    pub fn is_empty(&self) -> bool {
        self.request.is_none() && !self.status && !self.title
    }

    /// Drain everything recorded since the last take. A frame with only
    /// status/title work carries `CursorOnly` as its text request.
    pub fn take(&mut self) -> Option<PendingFrame> {
        if self.is_empty() {
            return None;
        }
        let frame = PendingFrame {
            request: self.request.unwrap_or(RenderRequest::CursorOnly),
            status: self.status,
            title: self.title,
        };
        *self = Self::default();
        Some(frame)
    }
}
