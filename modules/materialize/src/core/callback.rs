//! Callback protocol.
//!
//! Two shapes are used everywhere: a single-shot consumer receiving one value or one error, and
//! an indexed multi-shot consumer/predicate receiving elements followed by exactly one
//! `complete` or `error`.

/// Closure-backed single-shot consumer.
mod fn_future_consumer;
/// Closure-backed indexed consumer.
mod fn_indexed_future_consumer;
/// Closure-backed indexed predicate.
mod fn_indexed_future_predicate;
/// Single-shot consumer trait.
mod future_consumer;
/// Indexed protocol events.
mod indexed_event;
/// Indexed consumer trait.
mod indexed_future_consumer;
/// Indexed predicate trait.
mod indexed_future_predicate;
/// Call-boundary helpers.
pub(crate) mod invoke;

pub use fn_future_consumer::FnFutureConsumer;
pub use fn_indexed_future_consumer::FnIndexedFutureConsumer;
pub use fn_indexed_future_predicate::FnIndexedFuturePredicate;
pub use future_consumer::{BoxFutureConsumer, FutureConsumer};
pub use indexed_event::IndexedEvent;
pub use indexed_future_consumer::{BoxIndexedFutureConsumer, IndexedFutureConsumer};
pub use indexed_future_predicate::{BoxIndexedFuturePredicate, IndexedFuturePredicate};
