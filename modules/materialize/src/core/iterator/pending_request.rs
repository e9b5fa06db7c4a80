//! Pending waiter lists.
//!
//! Requests that cannot be answered yet are queued in registration order. Concurrent
//! `materialize_elements` callers are merged into one fan-out waiter so that all of them receive
//! the identical list. After a terminal transition every queued request is replayed, in order,
//! against the frozen state.

use alloc::{boxed::Box, collections::VecDeque, vec::Vec};

use super::IteratorMaterializer;
use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, FutureConsumer, invoke},
};


/// Fan-out waiter for `materialize_elements`.
pub(crate) struct ElementsFanOut<E> {
  consumers: Vec<BoxFutureConsumer<Vec<E>>>,
}

impl<E> ElementsFanOut<E> {
  pub(crate) fn new(consumer: BoxFutureConsumer<Vec<E>>) -> Self {
    let mut consumers = Vec::with_capacity(1);
    consumers.push(consumer);
    Self { consumers }
  }

  pub(crate) fn join(&mut self, other: Self) {
    self.consumers.extend(other.consumers);
  }
}

impl<E: Clone + Send> FutureConsumer<Vec<E>> for ElementsFanOut<E> {
  fn accept(&mut self, value: Vec<E>) -> Result<(), MaterializeError> {
    let mut consumers = core::mem::take(&mut self.consumers);
    if let Some(mut last) = consumers.pop() {
      for consumer in &mut consumers {
        invoke::accept(consumer.as_mut(), value.clone());
      }
      invoke::accept(last.as_mut(), value);
    }
    Ok(())
  }

  fn error(&mut self, error: MaterializeError) {
    for consumer in &mut self.consumers {
      consumer.error(error.clone());
    }
    self.consumers.clear();
  }
}

/// Adds an already skipped count to the result of a continued skip.
pub(crate) struct SkipOffsetConsumer {
  downstream: BoxFutureConsumer<usize>,
  offset:     usize,
}

impl SkipOffsetConsumer {
  pub(crate) fn boxed(downstream: BoxFutureConsumer<usize>, offset: usize) -> BoxFutureConsumer<usize> {
    Box::new(Self { downstream, offset })
  }
}

impl FutureConsumer<usize> for SkipOffsetConsumer {
  fn accept(&mut self, value: usize) -> Result<(), MaterializeError> {
    self.downstream.accept(value.saturating_add(self.offset))
  }

  fn error(&mut self, error: MaterializeError) {
    self.downstream.error(error);
  }
}

/// Outstanding protocol request.
pub(crate) enum PendingRequest<E> {
  Elements(ElementsFanOut<E>),
  HasNext(BoxFutureConsumer<bool>),
  Next(BoxIndexedFutureConsumer<E>),
  NextWhile(BoxIndexedFuturePredicate<E>),
  Skip { count: usize, skipped: usize, consumer: BoxFutureConsumer<usize> },
}

impl<E: Clone + Send + 'static> PendingRequest<E> {
  pub(crate) fn elements(consumer: BoxFutureConsumer<Vec<E>>) -> Self {
    Self::Elements(ElementsFanOut::new(consumer))
  }

  pub(crate) const fn skip(count: usize, consumer: BoxFutureConsumer<usize>) -> Self {
    Self::Skip { count, skipped: 0, consumer }
  }

  /// Re-issues the request against `state`.
  pub(crate) fn replay(self, state: &dyn IteratorMaterializer<E>) {
    match self {
      | Self::Elements(fan_out) => state.materialize_elements(Box::new(fan_out)),
      | Self::HasNext(consumer) => state.materialize_has_next(consumer),
      | Self::Next(consumer) => state.materialize_next(consumer),
      | Self::NextWhile(predicate) => state.materialize_next_while(predicate),
      | Self::Skip { count, skipped: 0, consumer } => state.materialize_skip(count, consumer),
      | Self::Skip { count, skipped, consumer } => {
        state.materialize_skip(count - skipped, SkipOffsetConsumer::boxed(consumer, skipped));
      },
    }
  }

  /// Delivers `error` without consulting any state.
  pub(crate) fn fail(self, error: MaterializeError) {
    match self {
      | Self::Elements(mut fan_out) => fan_out.error(error),
      | Self::HasNext(mut consumer) => consumer.error(error),
      | Self::Next(mut consumer) => consumer.error(error),
      | Self::NextWhile(mut predicate) => predicate.error(error),
      | Self::Skip { mut consumer, .. } => consumer.error(error),
    }
  }
}

/// Insertion-ordered waiter list.
pub(crate) struct PendingRequests<E> {
  requests: VecDeque<PendingRequest<E>>,
}

impl<E: Clone + Send + 'static> PendingRequests<E> {
  pub(crate) const fn new() -> Self {
    Self { requests: VecDeque::new() }
  }

  pub(crate) fn len(&self) -> usize {
    self.requests.len()
  }

  /// Appends a request; an elements request joins an already queued one.
  pub(crate) fn push(&mut self, request: PendingRequest<E>) {
    let request = match request {
      | PendingRequest::Elements(fan_out) => {
        match self.requests.iter_mut().find_map(|queued| match queued {
          | PendingRequest::Elements(existing) => Some(existing),
          | _ => None,
        }) {
          | Some(existing) => {
            existing.join(fan_out);
            return;
          },
          | None => PendingRequest::Elements(fan_out),
        }
      },
      | other => other,
    };
    self.requests.push_back(request);
  }

  pub(crate) fn push_front(&mut self, request: PendingRequest<E>) {
    self.requests.push_front(request);
  }

  pub(crate) fn pop_front(&mut self) -> Option<PendingRequest<E>> {
    self.requests.pop_front()
  }

  pub(crate) fn take_all(&mut self) -> VecDeque<PendingRequest<E>> {
    core::mem::take(&mut self.requests)
  }
}

/// Replays every request, in order, against `state`.
pub(crate) fn replay_all<E: Clone + Send + 'static>(
  requests: VecDeque<PendingRequest<E>>,
  state: &dyn IteratorMaterializer<E>,
) {
  for request in requests {
    request.replay(state);
  }
}
