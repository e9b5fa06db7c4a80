use portable_atomic::AtomicU8;

use super::MaterializerStatus;

#[test]
fn raw_round_trip_covers_every_status() {
  for status in [
    MaterializerStatus::Running,
    MaterializerStatus::Done,
    MaterializerStatus::Failed,
    MaterializerStatus::Cancelled,
  ] {
    assert_eq!(MaterializerStatus::from_u8(status.as_u8()), status);
  }
}

#[test]
fn compare_exchange_allows_single_transition() {
  let atomic = AtomicU8::new(MaterializerStatus::Running.as_u8());
  assert_eq!(
    MaterializerStatus::compare_exchange(MaterializerStatus::Running, MaterializerStatus::Done, &atomic),
    Ok(MaterializerStatus::Running)
  );
  assert_eq!(
    MaterializerStatus::compare_exchange(MaterializerStatus::Running, MaterializerStatus::Cancelled, &atomic),
    Err(MaterializerStatus::Done)
  );
  assert_eq!(MaterializerStatus::load(&atomic), MaterializerStatus::Done);
  assert!(MaterializerStatus::load(&atomic).is_terminal());
}
