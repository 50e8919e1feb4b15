//! `stockline-events` — real-time event fan-out.
//!
//! Mechanics only: an observer registry with best-effort broadcast, and an
//! asynchronous publisher that decouples event emission from the request path.
//! The event *shapes* live in the domain crates; this crate only knows how to
//! serialize them once (via [`WireEvent`]) and deliver the bytes.

pub mod observer;
pub mod publisher;
pub mod registry;
pub mod wire;

pub use observer::{ObserverId, ObserverSink, TransportClosed};
pub use publisher::EventPublisher;
pub use registry::ObserverRegistry;
pub use wire::WireEvent;
