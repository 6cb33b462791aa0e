//! Exit timer countdown against a real controller and mocked ports.

mod support;

use std::sync::Arc;

use burner_core::{EnableRequest, ExitTick, ExitTimer};
use burner_domain::{BurnerError, LockEvent, UnlockReason};
use support::Harness;

async fn locked_harness() -> Harness {
    let h = Harness::new().with_valid_policy(&[]).await;
    h.controller.enable(EnableRequest::default()).await.unwrap();
    h
}

#[tokio::test]
async fn start_requires_lock() {
    let h = Harness::new();
    let timer = ExitTimer::new(Arc::clone(&h.controller), 300);

    assert_eq!(timer.start(300), Err(BurnerError::NotLocked));
    assert!(!timer.snapshot().is_active);
}

#[tokio::test]
async fn zero_grace_is_rejected() {
    let h = locked_harness().await;
    let timer = ExitTimer::new(Arc::clone(&h.controller), 300);

    assert!(matches!(timer.start(0), Err(BurnerError::InvalidInput(_))));
}

#[tokio::test]
async fn countdown_unlocks_at_zero() {
    let h = locked_harness().await;
    let timer = ExitTimer::new(Arc::clone(&h.controller), 3);
    let mut events = h.controller.subscribe();
    timer.start_default().unwrap();

    assert_eq!(timer.tick().await, ExitTick::Counting { remaining_seconds: 2 });
    assert_eq!(timer.tick().await, ExitTick::Counting { remaining_seconds: 1 });
    assert!(h.controller.is_locked());
    assert_eq!(timer.tick().await, ExitTick::Unlocked);

    assert!(!h.controller.is_locked());
    assert!(!timer.snapshot().is_active);
    assert!(matches!(
        events.recv().await.unwrap(),
        LockEvent::Unlocked { reason: UnlockReason::ExitTimer, .. }
    ));
}

#[tokio::test]
async fn ticks_after_zero_do_not_disable_again() {
    let h = locked_harness().await;
    let timer = ExitTimer::new(Arc::clone(&h.controller), 1);
    timer.start_default().unwrap();

    assert_eq!(timer.tick().await, ExitTick::Unlocked);
    for _ in 0..5 {
        assert_eq!(timer.tick().await, ExitTick::Idle);
    }

    assert_eq!(h.log.count("enforcement.clear_all"), 1);
}

#[tokio::test]
async fn concurrent_ticks_at_zero_disable_once() {
    let h = locked_harness().await;
    let timer = Arc::new(ExitTimer::new(Arc::clone(&h.controller), 1));
    timer.start_default().unwrap();

    let (a, b) = tokio::join!(timer.tick(), timer.tick());

    assert!(matches!((a, b), (ExitTick::Unlocked, ExitTick::Idle) | (ExitTick::Idle, ExitTick::Unlocked)));
    assert_eq!(h.log.count("enforcement.clear_all"), 1);
}

#[tokio::test]
async fn cancel_keeps_lock() {
    let h = locked_harness().await;
    let timer = ExitTimer::new(Arc::clone(&h.controller), 2);
    timer.start_default().unwrap();
    timer.tick().await;

    timer.cancel();

    assert_eq!(timer.snapshot().remaining_seconds, 0);
    assert!(!timer.snapshot().is_active);
    assert_eq!(timer.tick().await, ExitTick::Idle);
    assert!(h.controller.is_locked());
}

#[tokio::test]
async fn unlock_elsewhere_drops_countdown() {
    let h = locked_harness().await;
    let timer = ExitTimer::new(Arc::clone(&h.controller), 10);
    timer.start_default().unwrap();

    h.controller.disable().await;

    assert_eq!(timer.tick().await, ExitTick::Idle);
    assert!(!timer.snapshot().is_active);
    assert_eq!(h.log.count("enforcement.clear_all"), 1);
}
