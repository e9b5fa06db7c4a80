//! Iterator materializers: the protocol, the state machine base, and the terminal states every
//! combinator eventually freezes into.

/// Cancelled terminal state.
mod cancelled_iterator_materializer;
/// Realized sequence over an iterator.
mod collection_to_iterator_materializer;
/// Realized sequence over a deque.
mod deque_to_iterator_materializer;
/// Shared `materialize_elements` exchange.
pub(crate) mod elements_batch;
/// Collecting predicate answering `materialize_elements`.
pub(crate) mod elements_collector;
/// Empty terminal state.
mod empty_iterator_materializer;
/// Failed terminal state.
mod failed_iterator_materializer;
/// Start-once waiter list.
pub(crate) mod freeze_gate;
/// In-progress combinator phase.
mod immaterial_state;
/// Materializer protocol.
mod iterator_materializer;
/// Realized sequence over a list.
mod list_to_iterator_materializer;
/// Buffered request-serving loop.
pub(crate) mod output_pump;
/// Pending waiter lists.
pub(crate) mod pending_request;
/// Shared cursor protocol of realized sequences.
mod realized_cursor;
/// State machine base.
mod stateful_iterator_materializer;
/// Renumbering forwarder.
mod wrapping_iterator_materializer;

pub use cancelled_iterator_materializer::CancelledIteratorMaterializer;
pub use collection_to_iterator_materializer::CollectionToIteratorMaterializer;
pub use deque_to_iterator_materializer::DequeToIteratorMaterializer;
pub use empty_iterator_materializer::EmptyIteratorMaterializer;
pub use failed_iterator_materializer::FailedIteratorMaterializer;
pub use immaterial_state::ImmaterialState;
pub use iterator_materializer::{IteratorMaterializer, SharedIteratorMaterializer};
pub use list_to_iterator_materializer::ListToIteratorMaterializer;
pub use stateful_iterator_materializer::StatefulIteratorMaterializer;
pub use wrapping_iterator_materializer::WrappingIteratorMaterializer;
