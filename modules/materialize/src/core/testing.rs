//! Synchronous probes for driving materializers in tests.
//!
//! Every probe records what it receives behind a shared lock, so a test can hand the callback to
//! a materializer and inspect the outcome afterwards, or observe that nothing arrived yet.

/// Synchronous drain helpers.
mod drain;
/// Indexed event recorder.
mod event_probe;
/// Externally released immaterial state.
mod parked_state;
/// Single-shot outcome recorder.
mod result_probe;

pub use drain::{collect_elements, drain_by_next};
pub use event_probe::EventProbe;
pub use parked_state::ParkedState;
pub use result_probe::ResultProbe;
