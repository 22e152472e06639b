//! Event bus carrying background results back to the frame loop.
//!
//! Chat turns complete on a worker thread; they publish here and the UI
//! drains the queue once per frame, applying events on the UI thread.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use crate::chat::TurnOutcome;

/// Events produced off the UI thread.
#[derive(Debug)]
pub enum ScoutEvent {
    /// A chat backend call finished (successfully or not).
    TurnFinished(TurnOutcome),
}

/// Shared event bus: clone-cheap via Arc.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<VecDeque<ScoutEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event. Callable from any thread.
    pub fn emit(&self, event: ScoutEvent) {
        self.queue().push_back(event);
    }

    /// Drain all pending events. Called by the UI layer each frame.
    pub fn drain(&self) -> Vec<ScoutEvent> {
        self.queue().drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue().is_empty()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<ScoutEvent>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
