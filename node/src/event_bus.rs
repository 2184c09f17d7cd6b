//! Fan-out of election events to subscribers.

use agora_election::ElectionEvent;

/// Synchronous fan-out event bus for election events.
///
/// Listeners run inline while the node still holds its write lock, so they
/// see events in acceptance order. Keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&ElectionEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ElectionEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ElectionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::{Identity, Phase};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&ElectionEvent::VoterRegistered(Identity::new("a")));

        assert_eq!(counter.load(Ordering::SeqCst), 11);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&ElectionEvent::PhaseChanged {
            from: Phase::Registration,
            to: Phase::ProposalIntake,
        });
    }

    #[test]
    fn listener_receives_correct_event_variant() {
        let saw_tie = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();

        let st = Arc::clone(&saw_tie);
        bus.subscribe(Box::new(move |event| {
            if let ElectionEvent::ProposalTie(indices) = event {
                st.fetch_add(indices.len(), Ordering::SeqCst);
            }
        }));

        bus.emit(&ElectionEvent::ProposalRegistered(1));
        bus.emit(&ElectionEvent::ProposalTie(vec![1, 2]));

        assert_eq!(saw_tie.load(Ordering::SeqCst), 2);
    }
}
