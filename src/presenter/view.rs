//! Rendering of countdown snapshots into a display model
//!
//! The presenter is a pure consumer of [`CountdownSnapshot`]: it decides
//! whether the countdown is visible at all, which label sits above the
//! digits, and what digit text each selected unit group shows. Display
//! clients receive the resulting [`CountdownView`] over the status API.

use serde::{Deserialize, Serialize};

use crate::engine::CountdownSnapshot;

use super::format::{double_digits, UnitSelection};

/// Text attached to the rendered countdown.
///
/// The per-unit labels sit under their digit groups. The counting label sits
/// above the digits while the countdown runs; the finished label replaces it
/// once the countdown completes. Either may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Labels {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
    pub counting: Option<String>,
    pub finished: Option<String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            days: "Days".to_string(),
            hours: "Hours".to_string(),
            minutes: "Minutes".to_string(),
            seconds: "Seconds".to_string(),
            counting: None,
            finished: None,
        }
    }
}

/// One rendered digit group: zero-padded digit text plus its unit label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitGroup {
    pub digits: String,
    pub label: String,
}

/// The rendered countdown: an optional label above the selected digit groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownView {
    pub label: Option<String>,
    pub groups: Vec<DigitGroup>,
}

/// Presenter configuration
#[derive(Debug, Clone, Default)]
pub struct PresenterOptions {
    /// Which digit groups to render
    pub units: UnitSelection,
    /// Label text
    pub labels: Labels,
    /// Hide the countdown until the remaining time drops strictly below this
    /// many seconds; `None` keeps it visible from the start
    pub visibility_threshold: Option<f64>,
}

/// Renders countdown snapshots for display clients
#[derive(Debug, Clone)]
pub struct Presenter {
    options: PresenterOptions,
}

impl Presenter {
    /// Create a presenter from its options
    pub fn new(options: PresenterOptions) -> Self {
        Self { options }
    }

    /// Whether the snapshot has counted down into the visible range
    pub fn is_visible(&self, snapshot: &CountdownSnapshot) -> bool {
        match self.options.visibility_threshold {
            Some(threshold) => snapshot.remaining_seconds < threshold,
            None => true,
        }
    }

    /// Render a snapshot, or `None` while the countdown is hidden.
    ///
    /// While the countdown is finished with the blink phase set, the digit
    /// text of every group is blanked; the groups themselves stay in place so
    /// the digits reappear on the opposite phase.
    pub fn render(&self, snapshot: &CountdownSnapshot) -> Option<CountdownView> {
        if !self.is_visible(snapshot) {
            return None;
        }

        let labels = &self.options.labels;
        let label = if snapshot.finished {
            labels.finished.clone()
        } else {
            labels.counting.clone()
        };

        let blanked = snapshot.finished && snapshot.blink_phase;
        let units = snapshot.time_left;
        let selection = self.options.units;

        let mut groups = Vec::new();
        if selection.days {
            groups.push(digit_group(units.days, &labels.days, blanked));
        }
        if selection.hours {
            groups.push(digit_group(units.hours, &labels.hours, blanked));
        }
        if selection.minutes {
            groups.push(digit_group(units.minutes, &labels.minutes, blanked));
        }
        if selection.seconds {
            groups.push(digit_group(units.seconds, &labels.seconds, blanked));
        }

        Some(CountdownView { label, groups })
    }
}

fn digit_group(value: u64, label: &str, blanked: bool) -> DigitGroup {
    let digits = if blanked {
        String::new()
    } else {
        double_digits(value)
    };
    DigitGroup {
        digits,
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TimeLeft;

    fn snapshot(remaining_seconds: f64, finished: bool, blink_phase: bool) -> CountdownSnapshot {
        CountdownSnapshot {
            remaining_seconds,
            finished,
            blink_phase,
            time_left: TimeLeft::from_seconds(remaining_seconds),
        }
    }

    fn labelled_presenter() -> Presenter {
        Presenter::new(PresenterOptions {
            labels: Labels {
                counting: Some("Sale ends in".to_string()),
                finished: Some("Sale is over".to_string()),
                ..Labels::default()
            },
            ..PresenterOptions::default()
        })
    }

    #[test]
    fn renders_all_groups_zero_padded() {
        let presenter = Presenter::new(PresenterOptions::default());
        // 1 day, 1 hour, 1 minute, 1 second
        let view = presenter.render(&snapshot(90_061.0, false, false)).unwrap();

        let digits: Vec<&str> = view.groups.iter().map(|g| g.digits.as_str()).collect();
        assert_eq!(digits, vec!["01", "01", "01", "01"]);
        let labels: Vec<&str> = view.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Days", "Hours", "Minutes", "Seconds"]);
    }

    #[test]
    fn renders_only_selected_units() {
        let presenter = Presenter::new(PresenterOptions {
            units: UnitSelection::parse("MS").unwrap(),
            ..PresenterOptions::default()
        });
        let view = presenter.render(&snapshot(90.0, false, false)).unwrap();

        assert_eq!(view.groups.len(), 2);
        assert_eq!(view.groups[0].digits, "01");
        assert_eq!(view.groups[0].label, "Minutes");
        assert_eq!(view.groups[1].digits, "30");
        assert_eq!(view.groups[1].label, "Seconds");
    }

    #[test]
    fn hidden_until_threshold_crossed() {
        let presenter = Presenter::new(PresenterOptions {
            visibility_threshold: Some(10.0),
            ..PresenterOptions::default()
        });

        assert!(presenter.render(&snapshot(15.0, false, false)).is_none());
        assert!(presenter.render(&snapshot(10.0, false, false)).is_none());
        assert!(presenter.render(&snapshot(9.0, false, false)).is_some());
    }

    #[test]
    fn no_threshold_is_always_visible() {
        let presenter = Presenter::new(PresenterOptions::default());
        assert!(presenter.is_visible(&snapshot(1_000_000.0, false, false)));
    }

    #[test]
    fn label_switches_when_finished() {
        let presenter = labelled_presenter();

        let running = presenter.render(&snapshot(5.0, false, false)).unwrap();
        assert_eq!(running.label.as_deref(), Some("Sale ends in"));

        let finished = presenter.render(&snapshot(0.0, true, false)).unwrap();
        assert_eq!(finished.label.as_deref(), Some("Sale is over"));
    }

    #[test]
    fn missing_labels_render_as_none() {
        let presenter = Presenter::new(PresenterOptions::default());
        let view = presenter.render(&snapshot(5.0, false, false)).unwrap();
        assert_eq!(view.label, None);
    }

    #[test]
    fn blink_phase_blanks_digit_text() {
        let presenter = Presenter::new(PresenterOptions::default());

        let blanked = presenter.render(&snapshot(0.0, true, true)).unwrap();
        assert!(blanked.groups.iter().all(|g| g.digits.is_empty()));
        // Unit labels stay put while the digits are blanked.
        assert_eq!(blanked.groups[0].label, "Days");

        let shown = presenter.render(&snapshot(0.0, true, false)).unwrap();
        assert!(shown.groups.iter().all(|g| g.digits == "00"));
    }

    #[test]
    fn blink_phase_is_ignored_while_running() {
        let presenter = Presenter::new(PresenterOptions::default());
        let view = presenter.render(&snapshot(42.0, false, true)).unwrap();
        assert_eq!(view.groups[3].digits, "42");
    }

    #[test]
    fn view_serializes_for_display_clients() {
        let presenter = labelled_presenter();
        let view = presenter.render(&snapshot(61.0, false, false)).unwrap();

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["label"], "Sale ends in");
        assert_eq!(json["groups"][2]["digits"], "01");
        assert_eq!(json["groups"][3]["digits"], "01");
        assert_eq!(json["groups"][3]["label"], "Seconds");
    }
}
