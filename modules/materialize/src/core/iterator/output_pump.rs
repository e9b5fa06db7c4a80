//! Request-serving loop shared by buffering combinators.
//!
//! A pump owns an output buffer and a waiter list. Requests are served from the buffer in
//! registration order; when the head request needs more data, exactly one upstream pull is issued
//! and the loop suspends until the pull callback re-enters [`drive`]. Once the upstream is
//! exhausted the pump freezes its machine into the buffered remainder and replays the waiters
//! against it.

use alloc::{collections::VecDeque, sync::Arc, vec::Vec};

use super::{
  ListToIteratorMaterializer, StatefulIteratorMaterializer,
  pending_request::{PendingRequest, PendingRequests, replay_all},
};
use crate::core::{
  MaterializeError,
  callback::{BoxFutureConsumer, BoxIndexedFutureConsumer, BoxIndexedFuturePredicate, invoke},
};


/// Buffer and waiter bookkeeping of a pump.
pub(crate) struct PumpQueue<E> {
  pub(crate) output:     VecDeque<E>,
  pub(crate) next_index: usize,
  pub(crate) exhausted:  bool,
  pub(crate) pulling:    bool,
  requests:              PendingRequests<E>,
  draining:              bool,
}

pub(crate) enum PumpStep<E> {
  Idle,
  Pull,
  Deliver(Delivery<E>),
  Finish { remaining: Vec<E>, offset: usize },
}

pub(crate) enum Delivery<E> {
  HasNext(BoxFutureConsumer<bool>, bool),
  Next(BoxIndexedFutureConsumer<E>, Option<usize>, usize, E),
  NextWhile(BoxIndexedFuturePredicate<E>, Option<usize>, usize, E),
  Skip(BoxFutureConsumer<usize>, usize),
}

impl<E: Clone + Send + 'static> Delivery<E> {
  /// Invokes the callback; returns the request again when it wants more elements.
  fn deliver(self) -> Option<PendingRequest<E>> {
    match self {
      | Self::HasNext(mut consumer, value) => {
        invoke::accept(consumer.as_mut(), value);
        None
      },
      | Self::Next(mut consumer, size, index, element) => {
        invoke::accept_indexed(consumer.as_mut(), size, index, element);
        None
      },
      | Self::NextWhile(mut predicate, size, index, element) => {
        invoke::test_indexed(predicate.as_mut(), size, index, element).then_some(PendingRequest::NextWhile(predicate))
      },
      | Self::Skip(mut consumer, skipped) => {
        invoke::accept(consumer.as_mut(), skipped);
        None
      },
    }
  }
}

impl<E: Clone + Send + 'static> PumpQueue<E> {
  pub(crate) const fn new() -> Self {
    Self {
      output:     VecDeque::new(),
      next_index: 0,
      exhausted:  false,
      pulling:    false,
      requests:   PendingRequests::new(),
      draining:   false,
    }
  }

  pub(crate) fn push(&mut self, request: PendingRequest<E>) {
    self.requests.push(request);
  }

  /// Number of elements still deliverable from the buffer once the upstream is exhausted.
  pub(crate) fn exhausted_size(&self) -> Option<usize> {
    self.exhausted.then_some(self.output.len())
  }

  fn begin_drain(&mut self) -> bool {
    if self.draining {
      return false;
    }
    self.draining = true;
    true
  }

  fn idle(&mut self) -> PumpStep<E> {
    self.draining = false;
    PumpStep::Idle
  }

  fn need_data(&mut self, request: PendingRequest<E>) -> PumpStep<E> {
    self.requests.push_front(request);
    if self.pulling {
      return self.idle();
    }
    self.pulling = true;
    PumpStep::Pull
  }

  fn pop_output(&mut self, remaining: Option<usize>) -> Option<(Option<usize>, usize, E)> {
    let element = self.output.pop_front()?;
    let index = self.next_index;
    self.next_index += 1;
    Some((remaining.map(|remaining| remaining.saturating_add(index)), index, element))
  }

  fn next_step(&mut self, remaining: Option<usize>) -> PumpStep<E> {
    if self.exhausted {
      let remaining = self.output.drain(..).collect();
      return PumpStep::Finish { remaining, offset: self.next_index };
    }
    let Some(request) = self.requests.pop_front() else {
      return self.idle();
    };
    match request {
      | PendingRequest::HasNext(consumer) if !self.output.is_empty() => {
        PumpStep::Deliver(Delivery::HasNext(consumer, true))
      },
      | PendingRequest::Next(consumer) => match self.pop_output(remaining) {
        | Some((size, index, element)) => PumpStep::Deliver(Delivery::Next(consumer, size, index, element)),
        | None => self.need_data(PendingRequest::Next(consumer)),
      },
      | PendingRequest::NextWhile(predicate) => match self.pop_output(remaining) {
        | Some((size, index, element)) => PumpStep::Deliver(Delivery::NextWhile(predicate, size, index, element)),
        | None => self.need_data(PendingRequest::NextWhile(predicate)),
      },
      | PendingRequest::Skip { count, skipped, consumer } => {
        let step = (count - skipped).min(self.output.len());
        self.output.drain(..step);
        self.next_index += step;
        let skipped = skipped + step;
        if skipped == count {
          PumpStep::Deliver(Delivery::Skip(consumer, skipped))
        } else {
          self.need_data(PendingRequest::Skip { count, skipped, consumer })
        }
      },
      | other => self.need_data(other),
    }
  }
}

/// Combinator driven by the pump loop.
pub(crate) trait Pump<E>: Send + Sync + Sized + 'static {
  /// Runs `f` with the queue locked.
  fn with_queue<R>(&self, f: impl FnOnce(&mut PumpQueue<E>) -> R) -> R;

  /// Issues one upstream pull. The pull callback must clear `pulling` and call [`drive`].
  fn pull(self: &Arc<Self>, machine: &StatefulIteratorMaterializer<E>);

  /// Remaining output count including buffered elements, when known.
  fn remaining(&self) -> Option<usize>;
}

/// Queues `request` and serves as much as possible.
pub(crate) fn submit<E, P>(pump: &Arc<P>, machine: &StatefulIteratorMaterializer<E>, request: PendingRequest<E>)
where
  E: Clone + Send + Sync + 'static,
  P: Pump<E>, {
  pump.with_queue(|queue| queue.push(request));
  drive(pump, machine);
}

/// Serves queued requests until they are answered or wait for an upstream callback.
pub(crate) fn drive<E, P>(pump: &Arc<P>, machine: &StatefulIteratorMaterializer<E>)
where
  E: Clone + Send + Sync + 'static,
  P: Pump<E>, {
  if !pump.with_queue(PumpQueue::begin_drain) {
    return;
  }
  loop {
    if let Some(state) = machine.frozen_state() {
      let requests = pump.with_queue(|queue| {
        queue.draining = false;
        queue.requests.take_all()
      });
      // a request queued after this point is followed by its own drive call
      replay_all(requests, &*state);
      return;
    }
    let remaining = pump.remaining();
    match pump.with_queue(|queue| queue.next_step(remaining)) {
      | PumpStep::Idle => return,
      | PumpStep::Pull => pump.pull(machine),
      | PumpStep::Deliver(delivery) => {
        if let Some(request) = delivery.deliver() {
          pump.with_queue(|queue| queue.requests.push_front(request));
        }
      },
      | PumpStep::Finish { remaining, offset } => {
        // losing the race means another transition already froze the machine
        let _ = machine.set_done(Arc::new(ListToIteratorMaterializer::from_offset(remaining, offset)));
      },
    }
  }
}

/// Fails the machine and releases every waiter with the resulting outcome.
pub(crate) fn fail<E, P>(pump: &Arc<P>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError)
where
  E: Clone + Send + Sync + 'static,
  P: Pump<E>, {
  pump.with_queue(|queue| queue.pulling = false);
  machine.set_failed(error);
  drive(pump, machine);
}

/// Cancels the machine and releases every waiter with the cancellation.
pub(crate) fn cancel<E, P>(pump: &Arc<P>, machine: &StatefulIteratorMaterializer<E>, error: MaterializeError)
where
  E: Clone + Send + Sync + 'static,
  P: Pump<E>, {
  machine.set_cancelled(error);
  drive(pump, machine);
}
