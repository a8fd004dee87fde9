//! Countdown engine module
//!
//! This module contains the countdown state machine and the capabilities it
//! is driven by: a wall clock for suspend/resume compensation and a scheduler
//! for the repeating tick and blink activities.

pub mod clock;
pub mod countdown;
pub mod scheduler;
pub mod state;
pub mod time_left;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{CountdownEngine, CountdownOptions};
pub use scheduler::{ManualScheduler, ScheduleHandle, Scheduler, TokioScheduler};
pub use state::{CountdownSnapshot, CountdownState, RunState, Transition};
pub use time_left::TimeLeft;
