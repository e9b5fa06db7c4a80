extern crate std;

use std::thread;

use super::Rendezvous;
use crate::core::{MaterializeError, callback::FutureConsumer};

#[test]
fn wait_returns_value_published_from_another_thread() {
  let rendezvous = Rendezvous::<u32>::new();
  let mut consumer = rendezvous.consumer();
  let producer = thread::spawn(move || consumer.accept(7));
  assert_eq!(rendezvous.wait(), Ok(7));
  assert_eq!(producer.join().unwrap(), Ok(()));
}

#[test]
fn first_outcome_wins() {
  let rendezvous = Rendezvous::<u32>::new();
  rendezvous.publish(Err(MaterializeError::NoSuchElement));
  rendezvous.publish(Ok(1));
  assert_eq!(rendezvous.wait(), Err(MaterializeError::NoSuchElement));
}
