//! The countdown engine: schedule ownership, hooks, and observable state
//!
//! [`CountdownEngine`] wraps the pure state machine with locking, scoped
//! schedule acquisition, hook dispatch, and snapshot publication. It is shared
//! as `Arc<CountdownEngine>` between the scheduler callbacks, the lifecycle
//! pump, and the HTTP layer.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::clock::{Clock, SystemClock};
use super::scheduler::{ScheduleHandle, Scheduler};
use super::state::{CountdownSnapshot, CountdownState, Transition};
use super::time_left::TimeLeft;

/// Period of the blink schedule once the countdown has finished
const BLINK_PERIOD: Duration = Duration::from_secs(1);

/// Completion hook, run at most once per engine lifetime
pub type FinishHook = Box<dyn FnOnce() + Send>;

/// Observer invoked after every successful one-second decrement
pub type TickHook = Box<dyn FnMut(TimeLeft) + Send>;

/// Engine configuration. Everything has a default except the initial time.
#[derive(Debug, Clone)]
pub struct CountdownOptions {
    /// Starting remaining time in seconds; zero or negative starts finished
    pub initial_seconds: f64,
    /// Period of the main tick schedule
    pub tick_interval: Duration,
    /// Whether the finished countdown toggles its blink phase
    pub blink_enabled: bool,
}

impl CountdownOptions {
    /// Options with the stated defaults: 1000 ms ticks, blink disabled
    pub fn new(initial_seconds: f64) -> Self {
        Self {
            initial_seconds,
            tick_interval: Duration::from_millis(1000),
            blink_enabled: false,
        }
    }

    /// Set the tick period (builder)
    pub fn tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Enable or disable the finished blink effect (builder)
    pub fn blink(mut self, blink_enabled: bool) -> Self {
        self.blink_enabled = blink_enabled;
        self
    }
}

/// The countdown engine.
///
/// All entry points serialize on the state mutex and run to completion before
/// hooks or observers see the outcome, so no hook ever runs under the lock.
/// Register hooks before calling [`start`](Self::start).
pub struct CountdownEngine {
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    state: Mutex<CountdownState>,
    finish_hook: Mutex<Option<FinishHook>>,
    tick_hook: Mutex<Option<TickHook>>,
    tick_schedule: Mutex<Option<ScheduleHandle>>,
    blink_schedule: Mutex<Option<ScheduleHandle>>,
    update_tx: watch::Sender<CountdownSnapshot>,
    /// Keep one receiver alive so publishing cannot observe a closed channel
    _update_rx: watch::Receiver<CountdownSnapshot>,
}

impl CountdownEngine {
    /// Create an engine on the system wall clock
    pub fn new(options: CountdownOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Create an engine on an injected clock
    pub fn with_clock(options: CountdownOptions, clock: Arc<dyn Clock>) -> Self {
        let state = CountdownState::new(options.initial_seconds, options.blink_enabled);
        let (update_tx, update_rx) = watch::channel(state.snapshot());
        Self {
            clock,
            tick_interval: options.tick_interval,
            state: Mutex::new(state),
            finish_hook: Mutex::new(None),
            tick_hook: Mutex::new(None),
            tick_schedule: Mutex::new(None),
            blink_schedule: Mutex::new(None),
            update_tx,
            _update_rx: update_rx,
        }
    }

    /// Register the completion hook, invoked exactly once on the
    /// Running to Finished transition
    pub fn on_finish(&self, hook: impl FnOnce() + Send + 'static) -> Result<(), String> {
        let mut slot = self
            .finish_hook
            .lock()
            .map_err(|e| format!("Failed to lock finish hook: {}", e))?;
        *slot = Some(Box::new(hook));
        Ok(())
    }

    /// Register the tick observer, invoked after every successful decrement
    pub fn on_tick(&self, hook: impl FnMut(TimeLeft) + Send + 'static) -> Result<(), String> {
        let mut slot = self
            .tick_hook
            .lock()
            .map_err(|e| format!("Failed to lock tick hook: {}", e))?;
        *slot = Some(Box::new(hook));
        Ok(())
    }

    /// Arm the tick schedule (and the blink schedule when enabled).
    ///
    /// If the countdown is already finished the completion hook fires before
    /// `start` returns and no tick schedule is armed. Calling `start` again
    /// replaces the previous schedules instead of stacking them; a stopped
    /// engine is re-armed.
    pub fn start(self: &Arc<Self>, scheduler: &dyn Scheduler) -> Result<(), String> {
        let (finished_at_start, fire_hook, blink_enabled, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            state.set_stopped(false);
            let blink_enabled = state.blink_enabled();
            if state.is_finished() {
                let fire_hook = state.finish();
                (true, fire_hook, blink_enabled, state.snapshot())
            } else {
                (false, false, blink_enabled, state.snapshot())
            }
        };

        if finished_at_start {
            info!("Countdown already finished at start");
            self.publish(snapshot);
            if fire_hook {
                self.run_finish_hook()?;
            }
        } else {
            let engine = Arc::downgrade(self);
            let tick = scheduler.repeat(
                self.tick_interval,
                Box::new(move || {
                    let Some(engine) = engine.upgrade() else {
                        return ControlFlow::Break(());
                    };
                    match engine.tick() {
                        Ok(Transition::Finished { .. }) => ControlFlow::Break(()),
                        Ok(_) => ControlFlow::Continue(()),
                        Err(e) => {
                            error!("Failed to apply scheduled tick: {}", e);
                            ControlFlow::Break(())
                        }
                    }
                }),
            );
            Self::store_schedule(&self.tick_schedule, tick)?;
            info!(
                "Countdown started: {:.0}s remaining, ticking every {:?}",
                snapshot.remaining_seconds, self.tick_interval
            );
        }

        if blink_enabled {
            let engine = Arc::downgrade(self);
            let blink = scheduler.repeat(
                BLINK_PERIOD,
                Box::new(move || {
                    let Some(engine) = engine.upgrade() else {
                        return ControlFlow::Break(());
                    };
                    if let Err(e) = engine.blink_tick() {
                        error!("Failed to apply blink tick: {}", e);
                        return ControlFlow::Break(());
                    }
                    ControlFlow::Continue(())
                }),
            );
            Self::store_schedule(&self.blink_schedule, blink)?;
        }

        Ok(())
    }

    /// One scheduled tick. Decrements the remaining time, or finishes the
    /// countdown once it is down to its last second.
    pub fn tick(&self) -> Result<Transition, String> {
        let (transition, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            let transition = state.tick();
            (transition, state.snapshot())
        };

        match transition {
            Transition::Ticked => {
                self.notify_tick(snapshot.time_left)?;
                self.publish(snapshot);
            }
            Transition::Finished { fire_hook } => {
                Self::release_schedule(&self.tick_schedule, "tick")?;
                self.publish(snapshot);
                info!("Countdown finished");
                if fire_hook {
                    self.run_finish_hook()?;
                }
            }
            Transition::None | Transition::Compensated => {}
        }
        Ok(transition)
    }

    /// Record that the host went to background. Idempotent while suspended:
    /// the first background event wins until a resume clears it.
    pub fn on_background(&self) -> Result<CountdownSnapshot, String> {
        let now = self.clock.now();
        let (recorded, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            (state.record_background(now), state.snapshot())
        };
        if recorded {
            debug!("Host went to background at {}", now);
        }
        Ok(snapshot)
    }

    /// Apply resume compensation for the wall-clock time spent in the
    /// background. A compensation that exhausts the remaining time finishes
    /// the countdown immediately, without waiting for the next tick.
    pub fn on_foreground(&self) -> Result<CountdownSnapshot, String> {
        let now = self.clock.now();
        let (transition, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            (state.apply_foreground(now), state.snapshot())
        };

        match transition {
            Transition::Compensated => {
                debug!(
                    "Resume compensation applied: {:.3}s remaining",
                    snapshot.remaining_seconds
                );
                self.publish(snapshot.clone());
            }
            Transition::Finished { fire_hook } => {
                Self::release_schedule(&self.tick_schedule, "tick")?;
                self.publish(snapshot.clone());
                info!("Countdown finished during background period");
                if fire_hook {
                    self.run_finish_hook()?;
                }
            }
            Transition::None | Transition::Ticked => {}
        }
        Ok(snapshot)
    }

    /// One scheduled blink tick. Toggles the blink phase only while the
    /// countdown is finished and blinking is enabled.
    pub fn blink_tick(&self) -> Result<bool, String> {
        let (toggled, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            (state.blink_tick(), state.snapshot())
        };
        if toggled {
            self.publish(snapshot);
        }
        Ok(toggled)
    }

    /// Cancel both schedules. Safe to call multiple times and before `start`;
    /// once `stop` returns, an invocation already queued at the scheduler can
    /// no longer mutate the countdown.
    pub fn stop(&self) -> Result<(), String> {
        {
            let mut state = self
                .state
                .lock()
                .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
            // The debounce flag goes up before the handles go away so a tick
            // already in flight observes it.
            state.set_stopped(true);
        }
        Self::release_schedule(&self.tick_schedule, "tick")?;
        Self::release_schedule(&self.blink_schedule, "blink")?;
        debug!("Countdown schedules released");
        Ok(())
    }

    /// Derived day/hour/minute/second units of the current remaining time
    pub fn time_left(&self) -> Result<TimeLeft, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.time_left())
    }

    /// Remaining time in seconds
    pub fn remaining_seconds(&self) -> Result<f64, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.remaining_seconds())
    }

    /// Whether the countdown has reached its terminal state
    pub fn is_finished(&self) -> Result<bool, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.is_finished())
    }

    /// Current blink phase (true while the digits are blanked)
    pub fn blink_phase(&self) -> Result<bool, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.blink_phase())
    }

    /// Whether the countdown should be rendered, given a visibility
    /// threshold: hidden at or above the threshold, visible strictly below.
    pub fn is_visible(&self, threshold_seconds: f64) -> Result<bool, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.is_visible(threshold_seconds))
    }

    /// Current read-model of the countdown
    pub fn snapshot(&self) -> Result<CountdownSnapshot, String> {
        let state = self
            .state
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))?;
        Ok(state.snapshot())
    }

    /// Watch receiver that observes a fresh snapshot after every mutation
    pub fn subscribe(&self) -> watch::Receiver<CountdownSnapshot> {
        self.update_tx.subscribe()
    }

    fn store_schedule(
        slot: &Mutex<Option<ScheduleHandle>>,
        handle: ScheduleHandle,
    ) -> Result<(), String> {
        let mut slot = slot
            .lock()
            .map_err(|e| format!("Failed to lock schedule slot: {}", e))?;
        // Replacing drops the previous handle, which cancels its repeat.
        *slot = Some(handle);
        Ok(())
    }

    fn release_schedule(
        slot: &Mutex<Option<ScheduleHandle>>,
        name: &str,
    ) -> Result<(), String> {
        let mut slot = slot
            .lock()
            .map_err(|e| format!("Failed to lock {} schedule slot: {}", name, e))?;
        if let Some(handle) = slot.take() {
            handle.cancel();
        }
        Ok(())
    }

    fn run_finish_hook(&self) -> Result<(), String> {
        let hook = {
            let mut slot = self
                .finish_hook
                .lock()
                .map_err(|e| format!("Failed to lock finish hook: {}", e))?;
            slot.take()
        };
        if let Some(hook) = hook {
            hook();
        }
        Ok(())
    }

    fn notify_tick(&self, time_left: TimeLeft) -> Result<(), String> {
        let mut slot = self
            .tick_hook
            .lock()
            .map_err(|e| format!("Failed to lock tick hook: {}", e))?;
        if let Some(hook) = slot.as_mut() {
            hook(time_left);
        }
        Ok(())
    }

    fn publish(&self, snapshot: CountdownSnapshot) {
        if let Err(e) = self.update_tx.send(snapshot) {
            warn!("Failed to send countdown update: {}", e);
        }
    }
}
