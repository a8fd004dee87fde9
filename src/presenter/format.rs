//! Digit-group selection and zero-padded digit text

/// Which of the day/hour/minute/second digit groups the countdown shows.
///
/// Parsed from a subset of the letters `DHMS`; display order is always
/// days, hours, minutes, seconds regardless of the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSelection {
    pub days: bool,
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl UnitSelection {
    /// Selection showing all four digit groups
    pub fn all() -> Self {
        Self {
            days: true,
            hours: true,
            minutes: true,
            seconds: true,
        }
    }

    /// Selection showing no digit groups
    pub fn none() -> Self {
        Self {
            days: false,
            hours: false,
            minutes: false,
            seconds: false,
        }
    }

    /// Parse a selection from a string of unit letters, e.g. "DHMS" or "ms".
    ///
    /// Letters may repeat and appear in any order or case; anything outside
    /// `DHMS` is rejected.
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut selection = Self::none();
        for letter in spec.chars() {
            match letter.to_ascii_uppercase() {
                'D' => selection.days = true,
                'H' => selection.hours = true,
                'M' => selection.minutes = true,
                'S' => selection.seconds = true,
                other => {
                    return Err(format!(
                        "Unknown time unit '{}', expected letters from \"DHMS\"",
                        other
                    ))
                }
            }
        }
        Ok(selection)
    }
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Format a unit value as digit text, zero-padded to at least two digits
pub fn double_digits(value: u64) -> String {
    format!("{:02}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_selection() {
        assert_eq!(UnitSelection::parse("DHMS").unwrap(), UnitSelection::all());
    }

    #[test]
    fn parses_subsets_in_any_order_and_case() {
        let selection = UnitSelection::parse("sm").unwrap();
        assert!(!selection.days);
        assert!(!selection.hours);
        assert!(selection.minutes);
        assert!(selection.seconds);
    }

    #[test]
    fn repeated_letters_are_harmless() {
        let selection = UnitSelection::parse("DDS").unwrap();
        assert!(selection.days);
        assert!(selection.seconds);
    }

    #[test]
    fn empty_selection_shows_nothing() {
        assert_eq!(UnitSelection::parse("").unwrap(), UnitSelection::none());
    }

    #[test]
    fn unknown_letters_are_rejected() {
        assert!(UnitSelection::parse("DHX").is_err());
    }

    #[test]
    fn digits_are_zero_padded_to_two() {
        assert_eq!(double_digits(0), "00");
        assert_eq!(double_digits(7), "07");
        assert_eq!(double_digits(59), "59");
    }

    #[test]
    fn digits_wider_than_two_keep_their_width() {
        // Day counts are unbounded; three-digit values stay three digits.
        assert_eq!(double_digits(365), "365");
    }
}
