//! Asynchronous event publisher.
//!
//! The movement path enqueues; a single background task drains the queue and
//! fans out. Enqueueing never blocks and never fails the caller, and the one
//! consumer task preserves enqueue order end to end, so observers see events
//! in commit order.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::registry::ObserverRegistry;
use crate::wire::WireEvent;

/// Non-blocking enqueue handle for domain events.
///
/// Cheap to clone; all clones feed the same fan-out task.
pub struct EventPublisher<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for EventPublisher<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E> EventPublisher<E>
where
    E: WireEvent + 'static,
{
    /// Spawn the fan-out task and return the enqueue handle.
    ///
    /// Each event is serialized exactly once, then broadcast to the registry's
    /// current snapshot. The task exits when every publisher handle is gone.
    pub fn spawn(registry: Arc<ObserverRegistry>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<E>();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let payload = event.to_wire().to_string();
                tracing::debug!(
                    message_type = event.message_type(),
                    observers = registry.len(),
                    "fanning out event"
                );
                registry.broadcast(&payload);
            }
        });

        Self { tx }
    }

    /// Hand an event to the fan-out task.
    ///
    /// A closed queue means the process is shutting down; the event is dropped
    /// (fan-out is best-effort by contract).
    pub fn enqueue(&self, event: E) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use super::*;

    struct TestEvent(u32);

    impl WireEvent for TestEvent {
        fn message_type(&self) -> &'static str {
            "test"
        }

        fn to_wire(&self) -> serde_json::Value {
            json!({ "tipo_msg": "test", "seq": self.0 })
        }
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for delivery")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn delivers_in_enqueue_order() {
        let registry = Arc::new(ObserverRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        registry.subscribe(Arc::new(tx));

        let publisher = EventPublisher::spawn(registry);
        for seq in 0..5 {
            publisher.enqueue(TestEvent(seq));
        }

        for seq in 0..5 {
            let payload = recv(&mut rx).await;
            assert_eq!(payload, json!({ "tipo_msg": "test", "seq": seq }).to_string());
        }
    }

    #[tokio::test]
    async fn late_subscriber_gets_no_catch_up() {
        let registry = Arc::new(ObserverRegistry::new());
        let (early_tx, mut early_rx) = mpsc::unbounded_channel::<String>();
        registry.subscribe(Arc::new(early_tx));

        let publisher = EventPublisher::spawn(registry.clone());
        publisher.enqueue(TestEvent(1));
        recv(&mut early_rx).await;

        // Subscribed after event 1 was fanned out: sees only event 2.
        let (late_tx, mut late_rx) = mpsc::unbounded_channel::<String>();
        registry.subscribe(Arc::new(late_tx));

        publisher.enqueue(TestEvent(2));
        assert_eq!(
            recv(&mut late_rx).await,
            json!({ "tipo_msg": "test", "seq": 2 }).to_string()
        );
        assert_eq!(
            recv(&mut early_rx).await,
            json!({ "tipo_msg": "test", "seq": 2 }).to_string()
        );
    }

    #[tokio::test]
    async fn disconnected_receiver_is_dropped_on_next_publish() {
        let registry = Arc::new(ObserverRegistry::new());
        let (tx, rx) = mpsc::unbounded_channel::<String>();
        registry.subscribe(Arc::new(tx));
        drop(rx);

        let (live_tx, mut live_rx) = mpsc::unbounded_channel::<String>();
        registry.subscribe(Arc::new(live_tx));

        let publisher = EventPublisher::spawn(registry.clone());
        publisher.enqueue(TestEvent(7));

        assert_eq!(
            recv(&mut live_rx).await,
            json!({ "tipo_msg": "test", "seq": 7 }).to_string()
        );
        assert_eq!(registry.len(), 1);
    }
}
