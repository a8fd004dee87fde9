//! Wall-clock access behind a seam so suspend compensation is testable

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Source of wall-clock time for suspend/resume compensation.
///
/// The countdown itself advances on scheduler ticks; the clock is only
/// consulted to measure how long the host spent in the background.
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock: time only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at the given instant
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Advance the clock by a fractional number of seconds
    pub fn advance_secs(&self, seconds: f64) {
        let mut now = self.now.lock().expect("Failed to lock manual clock");
        *now += Duration::milliseconds((seconds * 1000.0).round() as i64);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("Failed to lock manual clock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::default();
        let before = clock.now();
        assert_eq!(clock.now(), before);

        clock.advance_secs(2.5);
        let elapsed = clock.now() - before;
        assert_eq!(elapsed.num_milliseconds(), 2500);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
