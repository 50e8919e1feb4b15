//! Observer identity and the transport send capability.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier of a connected observer. Every connection is distinct.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// The observer's receiving side is gone.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("observer transport closed")]
pub struct TransportClosed;

/// Send capability of one connected observer.
///
/// This is all the registry knows about a transport: hand it a serialized
/// payload and learn whether the connection is still alive. `send` must not
/// block; a transport that buffers is expected to do so internally (an
/// observer that cannot keep up misses events or gets disconnected).
pub trait ObserverSink: Send + Sync {
    fn send(&self, payload: &str) -> Result<(), TransportClosed>;
}

/// Channel-backed sink: the receiving half is drained by the connection task.
impl ObserverSink for mpsc::UnboundedSender<String> {
    fn send(&self, payload: &str) -> Result<(), TransportClosed> {
        mpsc::UnboundedSender::send(self, payload.to_string()).map_err(|_| TransportClosed)
    }
}
