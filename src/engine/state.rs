//! Countdown state machine: remaining time, run state, and every transition
//!
//! All transitions are synchronous methods on [`CountdownState`] so the state
//! machine can be driven and inspected without any runtime. The engine wrapper
//! owns locking, schedules, hook dispatch, and snapshot publication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time_left::TimeLeft;

/// Two-state lifecycle of the countdown. Running to Finished is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Running,
    Finished,
}

/// What a mutating entry point did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed (stopped, already finished, or nothing to apply)
    None,
    /// One-second decrement applied while running
    Ticked,
    /// Remaining time adjusted by resume compensation, still running
    Compensated,
    /// The countdown just reached zero; `fire_hook` is true on the first
    /// entry only (the completion latch)
    Finished { fire_hook: bool },
}

impl Transition {
    /// Whether observers should be shown a fresh snapshot
    pub fn changed_state(&self) -> bool {
        !matches!(self, Transition::None)
    }
}

/// Serializable read-model of the countdown, published after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub remaining_seconds: f64,
    pub finished: bool,
    pub blink_phase: bool,
    pub time_left: TimeLeft,
}

/// The countdown state machine.
///
/// Remaining time is a non-negative number of seconds, fractional only while
/// resume compensation leaves a remainder, and monotonically non-increasing
/// while running. Reaching zero freezes it there.
#[derive(Debug, Clone)]
pub struct CountdownState {
    remaining_seconds: f64,
    run_state: RunState,
    went_background_at: Option<DateTime<Utc>>,
    blink_phase: bool,
    blink_enabled: bool,
    /// Completion latch, independent of the run state: the hook runs at most
    /// once per lifetime no matter how the terminal state is entered.
    finish_fired: bool,
    /// Debounce for invocations already queued when `stop()` returned
    stopped: bool,
}

impl CountdownState {
    /// Create a countdown from its configured initial value.
    ///
    /// Negative initial time is treated as already finished, not as an error.
    pub fn new(initial_seconds: f64, blink_enabled: bool) -> Self {
        let remaining_seconds = initial_seconds.max(0.0);
        let run_state = if remaining_seconds <= 0.0 {
            RunState::Finished
        } else {
            RunState::Running
        };
        Self {
            remaining_seconds,
            run_state,
            went_background_at: None,
            blink_phase: false,
            blink_enabled,
            finish_fired: false,
            stopped: false,
        }
    }

    /// Remaining time in seconds
    pub fn remaining_seconds(&self) -> f64 {
        self.remaining_seconds
    }

    /// Current run state
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether the countdown has reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.run_state == RunState::Finished
    }

    /// Current blink phase (true while the digits are blanked)
    pub fn blink_phase(&self) -> bool {
        self.blink_phase
    }

    /// Whether the blink effect was enabled for this instance
    pub fn blink_enabled(&self) -> bool {
        self.blink_enabled
    }

    /// Whether `stop()` has been observed
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Derived day/hour/minute/second units of the current remaining time
    pub fn time_left(&self) -> TimeLeft {
        TimeLeft::from_seconds(self.remaining_seconds)
    }

    /// Whether the countdown should be rendered at all: hidden while the
    /// remaining time is at or above the threshold, visible once it counts
    /// down strictly below it.
    pub fn is_visible(&self, threshold_seconds: f64) -> bool {
        self.remaining_seconds < threshold_seconds
    }

    /// Current read-model for observers
    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            remaining_seconds: self.remaining_seconds,
            finished: self.is_finished(),
            blink_phase: self.blink_phase,
            time_left: self.time_left(),
        }
    }

    /// Set or clear the stop debounce flag
    pub fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }

    /// One scheduled tick: decrement by exactly one second, or finish once
    /// the remaining time is down to its last second.
    pub fn tick(&mut self) -> Transition {
        if self.stopped || self.is_finished() {
            return Transition::None;
        }
        if self.remaining_seconds <= 1.0 {
            let fire_hook = self.finish();
            return Transition::Finished { fire_hook };
        }
        self.remaining_seconds -= 1.0;
        debug_assert!(self.remaining_seconds >= 0.0, "remaining time went negative");
        Transition::Ticked
    }

    /// Record the instant the host went to background.
    ///
    /// Returns true if a marker was recorded. The first background event wins:
    /// a marker already present is kept until a resume clears it.
    pub fn record_background(&mut self, now: DateTime<Utc>) -> bool {
        if self.stopped || self.went_background_at.is_some() {
            return false;
        }
        self.went_background_at = Some(now);
        true
    }

    /// Apply resume compensation: subtract the wall-clock time spent in the
    /// background from the remaining time, finishing if it runs out.
    ///
    /// Without a recorded background marker this is a no-op.
    pub fn apply_foreground(&mut self, now: DateTime<Utc>) -> Transition {
        if self.stopped {
            return Transition::None;
        }
        let Some(went_background_at) = self.went_background_at.take() else {
            return Transition::None;
        };
        if self.is_finished() {
            // Remaining time is frozen at zero; only the marker is cleared.
            return Transition::None;
        }

        let elapsed = (now - went_background_at).num_milliseconds() as f64 / 1000.0;
        self.remaining_seconds = (self.remaining_seconds - elapsed).max(0.0);
        debug_assert!(self.remaining_seconds >= 0.0, "remaining time went negative");

        if self.remaining_seconds <= 0.0 {
            let fire_hook = self.finish();
            Transition::Finished { fire_hook }
        } else {
            Transition::Compensated
        }
    }

    /// One scheduled blink tick: toggle the blink phase, but only once the
    /// countdown is finished and blinking was enabled for this instance.
    pub fn blink_tick(&mut self) -> bool {
        if self.stopped || !self.blink_enabled || !self.is_finished() {
            return false;
        }
        self.blink_phase = !self.blink_phase;
        true
    }

    /// Force the terminal state. Returns true the first time the completion
    /// latch trips, false on every later entry.
    pub(crate) fn finish(&mut self) -> bool {
        self.remaining_seconds = 0.0;
        self.run_state = RunState::Finished;
        if self.finish_fired {
            false
        } else {
            self.finish_fired = true;
            true
        }
    }
}
