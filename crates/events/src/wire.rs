//! Wire encoding seam between domain events and the fan-out machinery.

use serde_json::Value as JsonValue;

/// An event that can be put on the wire.
///
/// Domain crates implement this for their event types; the publisher encodes
/// each event exactly once per broadcast, regardless of observer count.
pub trait WireEvent: Send {
    /// Discriminator carried as `tipo_msg` in the wire payload.
    fn message_type(&self) -> &'static str;

    /// Full wire payload, including the discriminator.
    fn to_wire(&self) -> JsonValue;
}
