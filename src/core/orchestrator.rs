//! Call-test orchestration
//!
//! [`Orchestrator`] owns every piece of mutable run state (pending clip queue,
//! current-clip pointer, call registry, completed-call set) behind a single
//! lock. Webhook handlers only go through its methods.
//!
//! Lock discipline:
//! - every read that must agree with a mutation takes the same lock
//! - the lock is never held across network I/O; call placement runs in a
//!   detached task spawned after the lock is released
//!
//! Advancement is driven by the provider's status webhook: the first
//! `completed` event for a call marks it done and launches the next clip.
//! Duplicate or late terminal events for the same call are no-ops.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;

use super::clip::ClipRef;
use super::placer::{CallPlacer, CallRequest};
use super::pointer::PointerStore;
use super::queue::TestQueue;
use super::registry::CallRegistry;

/// Result of asking for the next test call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// A call is being placed for this clip
    Launched(ClipRef),
    /// Nothing left to test
    Exhausted,
}

/// Point-in-time view of the run, for the status route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSnapshot {
    pub pending: usize,
    pub registered_calls: usize,
    pub completed_calls: usize,
    pub current_clip: Option<ClipRef>,
    pub run_complete: bool,
}

#[derive(Debug, Default)]
struct RunState {
    queue: TestQueue,
    registry: CallRegistry,
    /// Earliest instant the next placement may start
    next_launch_at: Option<Instant>,
    run_complete: bool,
}

pub struct Orchestrator {
    state: Mutex<RunState>,
    placer: Arc<dyn CallPlacer>,
    pointer_store: Option<PointerStore>,
    launch_spacing: Duration,
}

impl Orchestrator {
    pub fn new(
        placer: Arc<dyn CallPlacer>,
        pointer_store: Option<PointerStore>,
        launch_spacing: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(RunState::default()),
            placer,
            pointer_store,
            launch_spacing,
        }
    }

    /// Enqueue the clip list and point at (and persist) its first entry.
    ///
    /// Returns the clip the pointer was set to, `None` for an empty list.
    pub fn seed(&self, clips: impl IntoIterator<Item = ClipRef>) -> Option<ClipRef> {
        let mut state = self.state.lock();
        for clip in clips {
            state.queue.enqueue(clip);
        }
        let head = state.queue.point_at_head().cloned();
        if let Some(ref clip) = head {
            self.persist_pointer(clip);
        }
        tracing::info!(pending = state.queue.len(), "Test queue seeded");
        head
    }

    /// Clip bound to `call_sid`, binding the current clip on first sight.
    ///
    /// A request without a call identifier gets the current clip and leaves
    /// the registry untouched.
    pub fn resolve(&self, call_sid: &str) -> ClipRef {
        let mut state = self.state.lock();
        let RunState {
            queue, registry, ..
        } = &mut *state;

        if call_sid.is_empty() {
            return queue.peek().cloned().unwrap_or_default();
        }
        registry.resolve(call_sid, queue.peek())
    }

    /// Clip bound to `call_sid`, or the empty placeholder for unknown calls.
    pub fn lookup(&self, call_sid: &str) -> ClipRef {
        self.state
            .lock()
            .registry
            .lookup(call_sid)
            .cloned()
            .unwrap_or_default()
    }

    pub fn current_clip(&self) -> Option<ClipRef> {
        self.state.lock().queue.peek().cloned()
    }

    /// Mark `call_sid` completed. Returns `true` only for the first call.
    pub fn complete_call(&self, call_sid: &str) -> bool {
        self.state.lock().registry.mark_completed(call_sid)
    }

    /// Handle a `completed` status: advance exactly once per call.
    ///
    /// Returns `None` when this call had already advanced the run.
    pub fn on_call_completed(self: &Arc<Self>, call_sid: &str) -> Option<LaunchOutcome> {
        if !self.complete_call(call_sid) {
            tracing::debug!(call_sid, "Duplicate completion ignored");
            return None;
        }
        Some(self.launch_next())
    }

    /// Dequeue the next clip and place a call for it in the background.
    ///
    /// A failed placement is logged by the background task. The clip stays
    /// consumed and the next one is launched, since no status webhook will
    /// ever arrive for a call the provider refused.
    pub fn launch_next(self: &Arc<Self>) -> LaunchOutcome {
        let (clip, delay) = {
            let mut state = self.state.lock();
            let Some(clip) = state.queue.dequeue() else {
                if !state.run_complete {
                    state.run_complete = true;
                    tracing::info!("All test calls have been placed and processed");
                }
                return LaunchOutcome::Exhausted;
            };
            self.persist_pointer(&clip);

            let now = Instant::now();
            let start = state.next_launch_at.map_or(now, |at| at.max(now));
            state.next_launch_at = Some(start + self.launch_spacing);

            (clip, start - now)
        };

        tracing::info!(clip = %clip, delay_ms = delay.as_millis() as u64, "Placing call for clip");

        let this = Arc::clone(self);
        let request = CallRequest { clip: clip.clone() };
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match this.placer.place_call(&request).await {
                Ok(call) => tracing::info!(
                    call_sid = %call.sid,
                    status = %call.status,
                    clip = %request.clip,
                    "Call placed"
                ),
                Err(e) => {
                    tracing::error!(clip = %request.clip, "Error placing call: {}", e);
                    this.launch_next();
                }
            }
        });

        LaunchOutcome::Launched(clip)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let state = self.state.lock();
        RunSnapshot {
            pending: state.queue.len(),
            registered_calls: state.registry.assigned_count(),
            completed_calls: state.registry.completed_count(),
            current_clip: state.queue.peek().cloned(),
            run_complete: state.run_complete,
        }
    }

    /// Called with the state lock held so pointer writes land in launch order.
    fn persist_pointer(&self, clip: &ClipRef) {
        if let Some(store) = &self.pointer_store {
            if let Err(e) = store.store(clip) {
                tracing::warn!(
                    path = %store.path().display(),
                    "Failed to persist current clip: {}",
                    e
                );
            }
        }
    }
}
