//! Process-wide logging setup for the stockline binaries.

pub mod tracing;

/// Install the global tracing subscriber. Call once from `main`; repeated
/// calls are harmless no-ops.
pub fn init() {
    tracing::init();
}
