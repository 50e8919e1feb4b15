//! Registry of currently connected observers.

use std::sync::{Arc, Mutex};

use crate::observer::{ObserverId, ObserverSink};

/// Mutex-guarded set of connected observers.
///
/// - Registration order is preserved; broadcasts deliver in that order.
/// - `broadcast` takes a snapshot of the set, then delivers outside the lock,
///   so connects/disconnects are never blocked by a slow fan-out. Observers
///   registered after the snapshot do not receive that event; observers
///   removed mid-fan-out may still get a best-effort attempt.
/// - A failed send unsubscribes the observer without aborting delivery to the
///   rest, and is never surfaced to the publisher.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<Vec<(ObserverId, Arc<dyn ObserverSink>)>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer; no duplicate prevention, every connection is
    /// its own observer.
    pub fn subscribe(&self, sink: Arc<dyn ObserverSink>) -> ObserverId {
        let id = ObserverId::new();

        // If the lock is poisoned the registry is effectively dead; the
        // subscription simply never receives anything.
        if let Ok(mut observers) = self.observers.lock() {
            observers.push((id, sink));
        }

        id
    }

    /// Remove an observer. Idempotent: unknown ids are a no-op.
    pub fn unsubscribe(&self, id: ObserverId) {
        if let Ok(mut observers) = self.observers.lock() {
            observers.retain(|(observer_id, _)| *observer_id != id);
        }
    }

    /// Deliver one already-serialized payload to every registered observer.
    pub fn broadcast(&self, payload: &str) {
        let snapshot: Vec<(ObserverId, Arc<dyn ObserverSink>)> = match self.observers.lock() {
            Ok(observers) => observers.clone(),
            Err(_) => return,
        };

        let mut failed: Vec<ObserverId> = Vec::new();
        for (id, sink) in &snapshot {
            if sink.send(payload).is_err() {
                tracing::debug!(observer = %id, "dropping observer after failed delivery");
                failed.push(*id);
            }
        }

        for id in failed {
            self.unsubscribe(id);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
