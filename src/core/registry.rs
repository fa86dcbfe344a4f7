//! Call-to-clip bindings and the set of calls that already advanced the run.

use std::collections::{HashMap, HashSet};

use super::clip::ClipRef;

/// Maps provider call identifiers to the clip each call is testing.
///
/// A binding is written once and never changes afterwards, so every later
/// webhook for the same call resolves to the same clip even after the queue
/// has moved on.
#[derive(Debug, Default)]
pub struct CallRegistry {
    assignments: HashMap<String, ClipRef>,
    completed: HashSet<String>,
}

impl CallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the clip bound to `call_sid`, binding `current` on first sight.
    ///
    /// When no binding exists and there is no current clip, nothing is
    /// recorded and the empty placeholder is returned.
    pub fn resolve(&mut self, call_sid: &str, current: Option<&ClipRef>) -> ClipRef {
        if let Some(bound) = self.assignments.get(call_sid) {
            return bound.clone();
        }
        match current {
            Some(clip) => {
                self.assignments
                    .insert(call_sid.to_string(), clip.clone());
                clip.clone()
            }
            None => ClipRef::empty(),
        }
    }

    /// Read-only lookup; never creates a binding.
    pub fn lookup(&self, call_sid: &str) -> Option<&ClipRef> {
        self.assignments.get(call_sid)
    }

    /// Record that `call_sid` completed. Returns `true` only the first time.
    pub fn mark_completed(&mut self, call_sid: &str) -> bool {
        self.completed.insert(call_sid.to_string())
    }

    pub fn is_completed(&self, call_sid: &str) -> bool {
        self.completed.contains(call_sid)
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }
}
