//! Event recorder: captures emitted election events for assertions.

use agora_election::ElectionEvent;
use std::sync::{Arc, Mutex};

/// Collects every event handed to it, in order.
///
/// Clones share the same buffer, so one clone can be moved into an event
/// listener while the test keeps another for assertions.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ElectionEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &ElectionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<ElectionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Take and clear the recorded events.
    pub fn drain(&self) -> Vec<ElectionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(|e| e.into_inner()))
    }
}
