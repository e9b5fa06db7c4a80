#![cfg(not(target_os = "none"))]

use core::num::NonZeroUsize;

use fraktor_materialize_rs::core::{
  IteratorPipeline, MaterializeError,
  callback::IndexedEvent,
  context::{ExecutionContextConfig, SerialExecutionContext},
  iterator::IteratorMaterializer,
  testing::EventProbe,
};

fn serial(min_throughput: usize) -> SerialExecutionContext {
  let throughput = NonZeroUsize::new(min_throughput).expect("non-zero");
  SerialExecutionContext::new(ExecutionContextConfig::new().with_name("serial").with_min_throughput(throughput))
}

fn scheduled_drain(context: &SerialExecutionContext, size: u32) -> (IteratorPipeline<u32>, EventProbe<u32>) {
  let pipeline = IteratorPipeline::from_vec_on((0..size).collect(), context.shared())
    .map(|_, value| value * 2)
    .scheduled(context.shared(), "drain");
  let probe = EventProbe::new();
  pipeline.materializer().materialize_next_while(probe.predicate(None));
  (pipeline, probe)
}

#[test]
fn drain_runs_in_ceil_m_over_n_executions() {
  for (size, throughput, executions) in [(10, 4, 3), (8, 4, 2), (9, 4, 3), (5, 1, 5)] {
    let context = serial(throughput);
    let (_pipeline, probe) = scheduled_drain(&context, size);
    assert!(probe.is_empty());

    let mut ran = 0;
    while context.run_next() {
      ran += 1;
      assert!(probe.elements().len() <= ran * throughput);
    }
    assert_eq!(ran, executions);
    assert_eq!(context.executed_tasks(), executions);
    assert_eq!(probe.elements(), (0..size).map(|value| value * 2).collect::<Vec<_>>());
    assert_eq!(probe.terminal(), Some(IndexedEvent::Complete { size: size as usize }));
  }
}

#[test]
fn cancel_between_executions_stops_the_rest() {
  let context = serial(4);
  let (pipeline, probe) = scheduled_drain(&context, 10);
  assert!(context.run_next());
  assert_eq!(probe.elements(), [0, 2, 4, 6]);
  assert_eq!(context.pending_tasks(), 1);

  pipeline.cancel(MaterializeError::cancelled("stop"));
  assert_eq!(context.pending_tasks(), 0);
  assert_eq!(context.run_until_idle(), 0);
  assert_eq!(probe.elements(), [0, 2, 4, 6]);
  assert_eq!(probe.terminal(), Some(IndexedEvent::Error(MaterializeError::cancelled("stop"))));
  assert!(pipeline.materializer().is_cancelled());
}

#[test]
fn drains_sharing_a_context_interleave() {
  let context = serial(2);
  let (_left, left) = scheduled_drain(&context, 4);
  let (_right, right) = scheduled_drain(&context, 4);

  assert!(context.run_next());
  assert_eq!((left.elements().len(), right.elements().len()), (2, 0));
  assert!(context.run_next());
  assert_eq!((left.elements().len(), right.elements().len()), (2, 2));
  assert_eq!(context.run_until_idle(), 2);
  assert_eq!(left.terminal(), Some(IndexedEvent::Complete { size: 4 }));
  assert_eq!(right.terminal(), Some(IndexedEvent::Complete { size: 4 }));
}
