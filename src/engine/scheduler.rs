//! Repeating-schedule capability with cancel-on-drop handles
//!
//! The engine acquires its tick and blink schedules through the [`Scheduler`]
//! trait and releases them by dropping the returned handles, so teardown can
//! never leak a repeating task. [`TokioScheduler`] drives repeats from spawned
//! interval tasks; [`ManualScheduler`] advances logical time deterministically
//! for tests.

use std::ops::ControlFlow;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// A repeating callback. Returning `ControlFlow::Break(())` ends the repeat
/// from inside the callback itself.
pub type RepeatFn = Box<dyn FnMut() -> ControlFlow<()> + Send>;

/// Capability to run a callback repeatedly at a fixed period.
pub trait Scheduler: Send + Sync {
    /// Arm a repeating schedule. The first invocation lands one full period
    /// after arming, not immediately.
    fn repeat(&self, period: Duration, callback: RepeatFn) -> ScheduleHandle;
}

/// Owner of one repeating schedule.
///
/// The repeat stops when [`cancel`](Self::cancel) is called or when the
/// handle is dropped, whichever comes first.
#[derive(Debug)]
pub struct ScheduleHandle {
    cancel_tx: watch::Sender<bool>,
}

impl ScheduleHandle {
    fn new() -> (Self, watch::Receiver<bool>) {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (Self { cancel_tx }, cancel_rx)
    }

    /// Cancel the schedule
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }
}

fn is_cancelled(cancel_rx: &watch::Receiver<bool>) -> bool {
    // Either an explicit cancel was sent or the handle was dropped.
    *cancel_rx.borrow() || cancel_rx.has_changed().is_err()
}

/// Scheduler backed by spawned tokio interval tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn repeat(&self, period: Duration, mut callback: RepeatFn) -> ScheduleHandle {
        let (handle, mut cancel_rx) = ScheduleHandle::new();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A stalled host gets resume compensation instead of a burst of
            // catch-up ticks.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The interval yields once immediately after arming; consume it so
            // the first callback lands a full period later.
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = cancel_rx.changed() => {
                        debug!("repeating schedule cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        if callback().is_break() {
                            debug!("repeating schedule ended by its callback");
                            break;
                        }
                    }
                }
            }
        });

        handle
    }
}

struct ManualSchedule {
    period: Duration,
    due_in: Duration,
    callback: RepeatFn,
    cancel_rx: watch::Receiver<bool>,
    done: bool,
}

/// Deterministic scheduler for tests: armed schedules fire only when logical
/// time is advanced, once per elapsed period.
#[derive(Default)]
pub struct ManualScheduler {
    schedules: Mutex<Vec<ManualSchedule>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance logical time, running every firing that falls inside the
    /// window in chronological order. Schedules due at the same instant fire
    /// in arming order, so a one-second advance interleaves a tick schedule
    /// and a blink schedule the way real time would.
    pub fn advance(&self, elapsed: Duration) {
        let mut schedules = self
            .schedules
            .lock()
            .expect("Failed to lock manual schedules");
        let mut window = elapsed;

        loop {
            schedules.retain(|schedule| !schedule.done && !is_cancelled(&schedule.cancel_rx));
            let Some(next_due) = schedules.iter().map(|schedule| schedule.due_in).min() else {
                return;
            };
            if next_due > window {
                for schedule in schedules.iter_mut() {
                    schedule.due_in -= window;
                }
                return;
            }

            window -= next_due;
            for schedule in schedules.iter_mut() {
                schedule.due_in -= next_due;
                if schedule.due_in.is_zero() {
                    // A handle cancelled by an earlier callback in this same
                    // instant must silence the schedule before it fires.
                    if is_cancelled(&schedule.cancel_rx) {
                        schedule.done = true;
                        continue;
                    }
                    schedule.due_in = schedule.period;
                    if (schedule.callback)().is_break() {
                        schedule.done = true;
                    }
                }
            }
        }
    }

    /// Advance logical time by whole seconds
    pub fn advance_secs(&self, seconds: u64) {
        self.advance(Duration::from_secs(seconds));
    }

    /// Number of schedules still armed
    pub fn live_schedules(&self) -> usize {
        let schedules = self
            .schedules
            .lock()
            .expect("Failed to lock manual schedules");
        schedules
            .iter()
            .filter(|schedule| !schedule.done && !is_cancelled(&schedule.cancel_rx))
            .count()
    }
}

impl Scheduler for ManualScheduler {
    fn repeat(&self, period: Duration, callback: RepeatFn) -> ScheduleHandle {
        // tokio's interval panics on a zero period; hold the fake to the same
        // contract rather than spin forever in advance().
        assert!(!period.is_zero(), "schedule period must be non-zero");
        let (handle, cancel_rx) = ScheduleHandle::new();
        self.schedules
            .lock()
            .expect("Failed to lock manual schedules")
            .push(ManualSchedule {
                period,
                due_in: period,
                callback,
                cancel_rx,
                done: false,
            });
        handle
    }
}
