use alloc::{sync::Arc, vec::Vec};

use spin::Mutex;

use crate::core::callback::{
  BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FnIndexedFutureConsumer, FnIndexedFuturePredicate, IndexedEvent,
};

/// Records every call of the indexed protocol.
pub struct EventProbe<P> {
  events: Arc<Mutex<Vec<IndexedEvent<P>>>>,
}

impl<P> Clone for EventProbe<P> {
  fn clone(&self) -> Self {
    Self { events: self.events.clone() }
  }
}

impl<P: Clone + Send + 'static> EventProbe<P> {
  /// Creates an empty probe.
  #[must_use]
  pub fn new() -> Self {
    Self { events: Arc::new(Mutex::new(Vec::new())) }
  }

  /// Returns an indexed consumer recording into this probe.
  #[must_use]
  pub fn consumer(&self) -> BoxIndexedFutureConsumer<P> {
    let events = self.events.clone();
    FnIndexedFutureConsumer::boxed(move |event| {
      events.lock().push(event);
      Ok(())
    })
  }

  /// Returns a predicate recording into this probe.
  ///
  /// With `Some(limit)` the predicate asks to stop once it has seen `limit` elements.
  #[must_use]
  pub fn predicate(&self, limit: Option<usize>) -> BoxIndexedFuturePredicate<P> {
    let events = self.events.clone();
    let mut seen = 0_usize;
    FnIndexedFuturePredicate::boxed(move |event: IndexedEvent<P>| {
      let is_next = matches!(event, IndexedEvent::Next { .. });
      events.lock().push(event);
      if is_next {
        seen += 1;
      }
      Ok(limit.is_none_or(|limit| seen < limit))
    })
  }

  /// Returns a snapshot of the recorded events.
  #[must_use]
  pub fn events(&self) -> Vec<IndexedEvent<P>> {
    self.events.lock().clone()
  }

  /// Returns the elements of the recorded `Next` events.
  #[must_use]
  pub fn elements(&self) -> Vec<P> {
    self
      .events
      .lock()
      .iter()
      .filter_map(|event| match event {
        | IndexedEvent::Next { element, .. } => Some(element.clone()),
        | _ => None,
      })
      .collect()
  }

  /// Returns the indices of the recorded `Next` events.
  #[must_use]
  pub fn indices(&self) -> Vec<usize> {
    self
      .events
      .lock()
      .iter()
      .filter_map(|event| match event {
        | IndexedEvent::Next { index, .. } => Some(*index),
        | _ => None,
      })
      .collect()
  }

  /// Returns the terminal event, if one was recorded.
  #[must_use]
  pub fn terminal(&self) -> Option<IndexedEvent<P>> {
    self.events.lock().iter().find(|event| !matches!(event, IndexedEvent::Next { .. })).cloned()
  }

  /// Returns `true` when no event was recorded.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.events.lock().is_empty()
  }

  /// Returns the number of recorded events.
  #[must_use]
  pub fn len(&self) -> usize {
    self.events.lock().len()
  }
}

impl<P: Clone + Send + 'static> Default for EventProbe<P> {
  fn default() -> Self {
    Self::new()
  }
}
