use alloc::{collections::VecDeque, sync::Arc, vec, vec::Vec};

use portable_atomic::{AtomicUsize, Ordering};

use super::TransformState;
use crate::core::{
  CancelSignal, MaterializeError, MaterializerStatus,
  callback::IndexedEvent,
  combinator::{DiffLogic, FilterLogic, LogicFlow, SecondarySource, TransformLogic},
  iterator::{
    CollectionToIteratorMaterializer, IteratorMaterializer, ListToIteratorMaterializer, SharedIteratorMaterializer,
    StatefulIteratorMaterializer,
  },
  testing::{EventProbe, ParkedState, ResultProbe},
};

struct FailAt(usize);

impl TransformLogic<u32, u32> for FailAt {
  fn apply(&mut self, index: usize, input: u32, output: &mut VecDeque<u32>) -> Result<LogicFlow, MaterializeError> {
    if index == self.0 {
      return Err(MaterializeError::failed("logic"));
    }
    output.push_back(input);
    Ok(LogicFlow::Continue)
  }
}

fn list(elements: Vec<u32>) -> SharedIteratorMaterializer<u32> {
  Arc::new(ListToIteratorMaterializer::new(elements))
}

fn even(_: usize, value: &u32) -> bool {
  value % 2 == 0
}

#[test]
fn pulls_upstream_only_while_output_is_needed() {
  let pulls = Arc::new(AtomicUsize::new(0));
  let counter = pulls.clone();
  let upstream: SharedIteratorMaterializer<u32> = Arc::new(CollectionToIteratorMaterializer::new((1..=10_u32).inspect(
    move |_| {
      counter.fetch_add(1, Ordering::Relaxed);
    },
  )));
  let machine =
    StatefulIteratorMaterializer::new(CancelSignal::new(), TransformState::new(upstream, FilterLogic::new(even)));

  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.events(), [IndexedEvent::Next { size: None, index: 0, element: 2 }]);
  assert_eq!(pulls.load(Ordering::Relaxed), 2);
  assert_eq!(machine.status(), MaterializerStatus::Running);

  let rest = ResultProbe::new();
  machine.materialize_elements(rest.consumer());
  assert_eq!(rest.take(), Some(Ok(vec![4, 6, 8, 10])));
  assert!(machine.is_succeeded());
}

#[test]
fn exhausted_output_completes_with_emitted_count() {
  let machine = StatefulIteratorMaterializer::new(
    CancelSignal::new(),
    TransformState::new(list(vec![1, 2, 3, 4]), FilterLogic::new(even)),
  );
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.indices(), [0, 1]);
  assert_eq!(probe.elements(), [2, 4]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 2 }));
}

#[test]
fn logic_failure_fails_the_machine() {
  let machine =
    StatefulIteratorMaterializer::new(CancelSignal::new(), TransformState::new(list(vec![1, 2, 3]), FailAt(1)));
  let probe = EventProbe::new();
  machine.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.events(), [
    IndexedEvent::Next { size: None, index: 0, element: 1 },
    IndexedEvent::Error(MaterializeError::failed("logic")),
  ]);
  assert!(machine.is_failed());
}

#[test]
fn upstream_failure_reaches_waiting_requests() {
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(CancelSignal::new(), parked.clone());
  let machine = StatefulIteratorMaterializer::new(
    CancelSignal::new(),
    TransformState::new(upstream.shared(), FilterLogic::new(even)),
  );
  let next = EventProbe::<u32>::new();
  machine.materialize_next(next.consumer());
  assert_eq!(parked.pending(), 1);

  upstream.set_failed(MaterializeError::failed("source"));
  parked.release(&upstream);
  assert_eq!(next.events(), [IndexedEvent::Error(MaterializeError::failed("source"))]);
  assert!(machine.is_failed());
}

#[test]
fn cancellation_propagates_upstream_and_wins() {
  let cancel = CancelSignal::new();
  let parked = ParkedState::new();
  let upstream = StatefulIteratorMaterializer::<u32>::new(cancel.clone(), parked.clone());
  let machine =
    StatefulIteratorMaterializer::new(cancel, TransformState::new(upstream.shared(), FilterLogic::new(even)));
  let has_next = ResultProbe::new();
  machine.materialize_has_next(has_next.consumer());

  machine.materialize_cancel(MaterializeError::cancelled("user"));
  assert_eq!(parked.cancellations(), [MaterializeError::cancelled("user")]);
  assert_eq!(has_next.take(), Some(Err(MaterializeError::cancelled("user"))));
  assert_eq!(machine.status(), MaterializerStatus::Cancelled);
  assert!(upstream.is_cancelled());
}

#[test]
fn callback_failure_stays_with_the_callback() {
  let machine = StatefulIteratorMaterializer::new(
    CancelSignal::new(),
    TransformState::new(list(vec![1, 2, 3, 4]), FilterLogic::new(even)),
  );
  let has_next = ResultProbe::new();
  machine.materialize_has_next(has_next.failing_consumer(MaterializeError::callback_failed("boom")));
  assert_eq!(has_next.calls(), 2);
  assert_eq!(has_next.take(), Some(Err(MaterializeError::callback_failed("boom"))));
  assert_eq!(machine.status(), MaterializerStatus::Running);

  let next = EventProbe::new();
  machine.materialize_next(next.consumer());
  assert_eq!(next.elements(), [2]);
}

#[test]
fn secondary_is_materialized_before_the_first_pull() {
  let state =
    TransformState::with_secondary(list(vec![1, 1, 2, 3]), SecondarySource::from(vec![1, 3]), DiffLogic::new());
  let machine = StatefulIteratorMaterializer::new(CancelSignal::new(), state);
  assert!(machine.weight_next() >= 2);
  let rest = ResultProbe::new();
  machine.materialize_elements(rest.consumer());
  assert_eq!(rest.take(), Some(Ok(vec![1, 2])));
}
