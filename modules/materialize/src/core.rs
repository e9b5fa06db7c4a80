//! `no_std` materialization engine: callback protocol, state machine base, terminal states,
//! combinators and the cooperative scheduling glue.

/// Callback protocol shared by every materializer.
pub mod callback;
/// Sequence combinators.
pub mod combinator;
/// Execution contexts and scheduled dispatch.
pub mod context;
/// Iterator materializers, terminal states and combinators.
pub mod iterator;
/// Random-access list materializers.
pub mod list;
/// Probes for exercising materializers in tests.
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

/// Write-once cancellation cell.
mod cancel_signal;
/// Pipeline wiring helper.
mod iterator_pipeline;
/// Error type.
mod materialize_error;
/// Materializer lifecycle status.
mod materializer_status;
/// Saturating size and weight arithmetic.
mod size_arithmetic;

pub use cancel_signal::CancelSignal;
pub use iterator_pipeline::IteratorPipeline;
pub use materialize_error::MaterializeError;
pub use materializer_status::MaterializerStatus;
pub use size_arithmetic::{saturating_size_add, saturating_weight_add, shift_size};

/// Tracing target used by every event emitted from this crate.
pub const LOG_TARGET: &str = "fraktor::materialize";
