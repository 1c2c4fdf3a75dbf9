//! UI context and scheduler tests against the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use operable_core::{ManualClock, UiContext};

#[test]
fn test_defer_runs_after_delay() {
    let clock = Arc::new(ManualClock::new());
    let ctx = UiContext::with_clock(clock.clone());

    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();
    ctx.defer(Duration::from_millis(100), move || {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(ctx.scheduler().run_due(), 0);
    clock.advance(Duration::from_millis(100));
    assert_eq!(ctx.scheduler().run_due(), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cancel_before_deadline() {
    let clock = Arc::new(ManualClock::new());
    let ctx = UiContext::with_clock(clock.clone());

    let fired = Arc::new(AtomicUsize::new(0));
    let fired_clone = fired.clone();
    let task = ctx.defer(Duration::from_millis(50), move || {
        fired_clone.fetch_add(1, Ordering::SeqCst);
    });
    assert!(ctx.scheduler().cancel(task));

    clock.advance(Duration::from_secs(1));
    ctx.scheduler().run_due();
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[test]
fn test_chained_timers_drain_in_order() {
    let clock = Arc::new(ManualClock::new());
    let ctx = UiContext::with_clock(clock.clone());

    // A task rescheduling itself three times, the pattern behind
    // announcement pacing.
    let steps = Arc::new(AtomicUsize::new(0));
    fn step(ctx: Arc<UiContext>, steps: Arc<AtomicUsize>) {
        if steps.fetch_add(1, Ordering::SeqCst) + 1 < 3 {
            let next_ctx = ctx.clone();
            ctx.defer(Duration::from_millis(10), move || {
                step(next_ctx.clone(), steps);
            });
        }
    }
    let start_ctx = ctx.clone();
    let start_steps = steps.clone();
    ctx.defer(Duration::from_millis(10), move || {
        step(start_ctx.clone(), start_steps);
    });

    for _ in 0..3 {
        clock.advance(Duration::from_millis(10));
        ctx.scheduler().run_due();
    }
    assert_eq!(steps.load(Ordering::SeqCst), 3);
    assert_eq!(ctx.scheduler().pending(), 0);
}

#[test]
fn test_shutdown_gates_operations() {
    let ctx = UiContext::new();
    assert!(ctx.ensure_live("test").is_ok());

    ctx.shutdown();
    let err = ctx.ensure_live("test").unwrap_err();
    assert!(err.to_string().contains("test"));
}
