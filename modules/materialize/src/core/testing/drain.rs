use alloc::vec::Vec;

use super::{EventProbe, ResultProbe};
use crate::core::{MaterializeError, callback::IndexedEvent, iterator::IteratorMaterializer};

/// Requests every element at once.
///
/// Returns `None` when the materializer did not answer synchronously, e.g. because its work is
/// queued on an execution context that has not run yet.
#[must_use]
pub fn collect_elements<E, M>(materializer: &M) -> Option<Result<Vec<E>, MaterializeError>>
where
  E: Send + 'static,
  M: IteratorMaterializer<E> + ?Sized, {
  let probe = ResultProbe::new();
  materializer.materialize_elements(probe.consumer());
  probe.take()
}

/// Pulls elements one `materialize_next` at a time until the sequence completes.
///
/// Returns `None` as soon as one request is not answered synchronously.
#[must_use]
pub fn drain_by_next<E, M>(materializer: &M) -> Option<Result<Vec<E>, MaterializeError>>
where
  E: Clone + Send + 'static,
  M: IteratorMaterializer<E> + ?Sized, {
  let mut elements = Vec::new();
  loop {
    let probe = EventProbe::new();
    materializer.materialize_next(probe.consumer());
    match probe.events().pop()? {
      | IndexedEvent::Next { element, .. } => elements.push(element),
      | IndexedEvent::Complete { .. } => return Some(Ok(elements)),
      | IndexedEvent::Error(error) => return Some(Err(error)),
    }
  }
}
