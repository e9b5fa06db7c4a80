use alloc::{vec, vec::Vec};
use core::num::NonZeroUsize;

use super::ListToIteratorMaterializer;
use crate::core::{
  MaterializeError,
  callback::IndexedEvent,
  context::{ExecutionContext, ExecutionContextConfig, SerialExecutionContext},
  iterator::IteratorMaterializer,
  testing::{EventProbe, ResultProbe, drain_by_next},
};

fn serial(min_throughput: usize) -> SerialExecutionContext {
  let throughput = NonZeroUsize::new(min_throughput).expect("non-zero");
  SerialExecutionContext::new(ExecutionContextConfig::new().with_min_throughput(throughput))
}

#[test]
fn next_reports_size_hint_and_completes_with_count() {
  let list = ListToIteratorMaterializer::new(vec!['a', 'b']);
  let probe = EventProbe::new();
  for _ in 0..3 {
    list.materialize_next(probe.consumer());
  }
  assert_eq!(probe.events(), [
    IndexedEvent::Next { size: Some(2), index: 0, element: 'a' },
    IndexedEvent::Next { size: Some(2), index: 1, element: 'b' },
    IndexedEvent::Complete { size: 2 },
  ]);
}

#[test]
fn offset_shifts_indices_and_final_count() {
  let list = ListToIteratorMaterializer::from_offset(vec![10, 11], 5);
  let probe = EventProbe::new();
  list.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.indices(), [5, 6]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 7 }));
}

#[test]
fn skip_and_elements_share_the_cursor() {
  let list = ListToIteratorMaterializer::new((0..6).collect::<Vec<u32>>());
  let skipped = ResultProbe::new();
  list.materialize_skip(4, skipped.consumer());
  assert_eq!(skipped.take(), Some(Ok(4)));
  assert_eq!(list.known_size(), Some(2));

  let rest = ResultProbe::new();
  list.materialize_elements(rest.consumer());
  assert_eq!(rest.take(), Some(Ok(vec![4, 5])));

  let past_end = ResultProbe::new();
  list.materialize_skip(3, past_end.consumer());
  assert_eq!(past_end.take(), Some(Ok(0)));
}

#[test]
fn predicate_stopping_leaves_the_rest_available() {
  let list = ListToIteratorMaterializer::new(vec![1, 2, 3, 4]);
  let probe = EventProbe::new();
  list.materialize_next_while(probe.predicate(Some(2)));
  assert_eq!(probe.elements(), [1, 2]);
  assert_eq!(probe.terminal(), None);
  assert_eq!(drain_by_next(&list), Some(Ok(vec![3, 4])));
}

#[test]
fn drain_through_context_yields_every_min_throughput_elements() {
  let context = serial(4);
  let list = ListToIteratorMaterializer::new((0..10).collect::<Vec<u32>>()).with_context(context.shared());
  let probe = EventProbe::new();
  list.materialize_next_while(probe.predicate(None));
  assert_eq!(probe.elements(), [0, 1, 2, 3]);
  assert_eq!(context.pending_tasks(), 1);

  assert_eq!(context.run_until_idle(), 2);
  assert_eq!(probe.elements(), (0..10).collect::<Vec<u32>>());
  assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: 10 }));
}

#[test]
fn interrupted_drain_fails_its_predicate() {
  let context = serial(4);
  let list = ListToIteratorMaterializer::new((0..10).collect::<Vec<u32>>()).with_context(context.shared());
  let probe = EventProbe::new();
  list.materialize_next_while(probe.predicate(None));
  assert_eq!(context.pending_tasks(), 1);

  context.interrupt_task("materialize-drain");
  assert_eq!(context.pending_tasks(), 0);
  assert_eq!(probe.elements(), [0, 1, 2, 3]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Error(MaterializeError::Interrupted)));
}
