//! Derived day/hour/minute/second units of a remaining-time value

use std::fmt;

use serde::{Deserialize, Serialize};

/// Time units derived from a remaining-seconds value.
///
/// Always recomputed from the current remaining time, never stored alongside
/// it, so the units cannot drift from the value they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeLeft {
    /// Derive units from a remaining-seconds value.
    ///
    /// Fractional remainders (left behind by suspend compensation) are
    /// floored away; negative inputs are treated as zero.
    pub fn from_seconds(remaining_seconds: f64) -> Self {
        let total = remaining_seconds.max(0.0).floor() as u64;
        Self {
            days: total / 86_400,
            hours: (total / 3_600) % 24,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }

    /// Check if every unit is zero
    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_each_unit() {
        // 1 day, 1 hour, 1 minute, 1 second
        let units = TimeLeft::from_seconds(90_061.0);
        assert_eq!(
            units,
            TimeLeft {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn zero_remaining() {
        let units = TimeLeft::from_seconds(0.0);
        assert!(units.is_zero());
        assert_eq!(units.to_string(), "00:00:00:00");
    }

    #[test]
    fn fractional_remaining_floors() {
        let units = TimeLeft::from_seconds(61.9);
        assert_eq!(units.minutes, 1);
        assert_eq!(units.seconds, 1);
    }

    #[test]
    fn negative_remaining_treated_as_zero() {
        assert!(TimeLeft::from_seconds(-5.0).is_zero());
    }

    #[test]
    fn units_wrap_at_their_bases() {
        // 2 days minus one second
        let units = TimeLeft::from_seconds(172_799.0);
        assert_eq!(
            units,
            TimeLeft {
                days: 1,
                hours: 23,
                minutes: 59,
                seconds: 59
            }
        );
    }

    #[test]
    fn display_is_zero_padded() {
        let units = TimeLeft::from_seconds(90_061.0);
        assert_eq!(units.to_string(), "01:01:01:01");
    }
}
