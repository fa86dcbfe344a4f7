//! FIFO queue of clips awaiting a test call, plus the current-clip pointer.
//!
//! The queue is not synchronised on its own. The orchestrator owns it inside
//! its single critical section so that `dequeue` and the pointer write are
//! observed together.

use std::collections::VecDeque;

use super::clip::ClipRef;

#[derive(Debug, Default)]
pub struct TestQueue {
    pending: VecDeque<ClipRef>,
    current: Option<ClipRef>,
}

impl TestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clip in input order.
    pub fn enqueue(&mut self, clip: ClipRef) {
        self.pending.push_back(clip);
    }

    /// Remove the head of the queue and make it the current clip.
    ///
    /// Returns `None` once the queue is exhausted; the pointer is left as is.
    pub fn dequeue(&mut self) -> Option<ClipRef> {
        let clip = self.pending.pop_front()?;
        self.current = Some(clip.clone());
        Some(clip)
    }

    /// Most recently assigned clip, independent of what remains queued.
    pub fn peek(&self) -> Option<&ClipRef> {
        self.current.as_ref()
    }

    /// Point at the head without consuming it (used when seeding at startup).
    pub fn point_at_head(&mut self) -> Option<&ClipRef> {
        if let Some(head) = self.pending.front() {
            self.current = Some(head.clone());
        }
        self.current.as_ref()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
