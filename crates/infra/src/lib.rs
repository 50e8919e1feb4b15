//! `stockline-infra` — storage backends and movement orchestration.
//!
//! The ledger store seam ([`store::LedgerStore`]) keeps the movement engine
//! testable against the in-memory store and swappable onto sqlite without
//! touching domain code.

pub mod engine;
pub mod store;

pub use engine::{MovementError, MovementService};
pub use store::{InMemoryLedgerStore, LedgerStore, SqliteLedgerStore, StoreError};
