//! std-only adapters: a tokio-driven execution context and a blocking bridge.

/// Blocking bridge over a materializer.
mod blocking_iterator_materializer;
/// Condvar-backed single-value handoff.
mod rendezvous;
/// Tokio-driven execution context.
mod tokio_execution_context;

pub use blocking_iterator_materializer::BlockingIteratorMaterializer;
pub use tokio_execution_context::TokioExecutionContext;
