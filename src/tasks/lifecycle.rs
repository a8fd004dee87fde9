//! Host lifecycle event pump
//!
//! Background/foreground transitions arrive on a channel, fed by the signal
//! stream in production or directly by tests, and are forwarded to the
//! countdown engine's handlers. The most recent event is recorded for the
//! status endpoint.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::CountdownEngine;

/// A host lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The host left the foreground; scheduled ticks may stop arriving
    Background,
    /// The host is active again; missed time is compensated from the wall clock
    Foreground,
}

impl LifecycleEvent {
    /// Event name as reported by the status endpoint
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Background => "background",
            LifecycleEvent::Foreground => "foreground",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of the most recent lifecycle event, shared between the pump, the
/// lifecycle endpoints, and the status endpoint
#[derive(Debug, Default)]
pub struct LifecycleLog {
    last_event: Mutex<Option<(LifecycleEvent, DateTime<Utc>)>>,
}

impl LifecycleLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event as the most recent one
    pub fn record(&self, event: LifecycleEvent) {
        if let Ok(mut last_event) = self.last_event.lock() {
            *last_event = Some((event, Utc::now()));
        }
    }

    /// Get the most recent event name and when it was recorded
    pub fn last(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_event.lock() {
            Ok(last_event) => match &*last_event {
                Some((event, at)) => (Some(event.name().to_string()), Some(*at)),
                None => (None, None),
            },
            Err(_) => (None, None),
        }
    }
}

/// Background task that forwards lifecycle events to the countdown engine
pub async fn lifecycle_pump_task(
    engine: Arc<CountdownEngine>,
    log: Arc<LifecycleLog>,
    mut events: mpsc::Receiver<LifecycleEvent>,
) {
    info!("Starting lifecycle pump task");

    while let Some(event) = events.recv().await {
        let result = match event {
            LifecycleEvent::Background => engine.on_background(),
            LifecycleEvent::Foreground => engine.on_foreground(),
        };

        match result {
            Ok(snapshot) => {
                debug!(
                    "Applied {} event: {:.3}s remaining, finished={}",
                    event, snapshot.remaining_seconds, snapshot.finished
                );
                log.record(event);
            }
            Err(e) => {
                error!("Failed to apply {} event: {}", event, e);
            }
        }
    }

    debug!("Lifecycle event channel closed, stopping pump");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CountdownOptions, ManualClock};
    use std::time::Duration;

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    #[test]
    fn log_tracks_the_most_recent_event() {
        let log = LifecycleLog::new();
        assert_eq!(log.last(), (None, None));

        log.record(LifecycleEvent::Background);
        let (name, at) = log.last();
        assert_eq!(name.as_deref(), Some("background"));
        assert!(at.is_some());

        log.record(LifecycleEvent::Foreground);
        assert_eq!(log.last().0.as_deref(), Some("foreground"));
    }

    #[tokio::test]
    async fn pump_applies_suspend_resume_compensation() {
        let clock = Arc::new(ManualClock::default());
        let engine = Arc::new(CountdownEngine::with_clock(
            CountdownOptions::new(60.0),
            clock.clone(),
        ));
        let log = Arc::new(LifecycleLog::new());
        let (event_tx, event_rx) = mpsc::channel(16);
        tokio::spawn(lifecycle_pump_task(
            Arc::clone(&engine),
            Arc::clone(&log),
            event_rx,
        ));

        event_tx.send(LifecycleEvent::Background).await.unwrap();
        // The marker must be recorded before logical time moves on.
        let marker_log = Arc::clone(&log);
        wait_until(move || marker_log.last().0.as_deref() == Some("background")).await;

        clock.advance_secs(12.5);
        event_tx.send(LifecycleEvent::Foreground).await.unwrap();
        let resume_log = Arc::clone(&log);
        wait_until(move || resume_log.last().0.as_deref() == Some("foreground")).await;

        assert_eq!(engine.remaining_seconds().unwrap(), 47.5);
        assert!(!engine.is_finished().unwrap());
    }

    #[tokio::test]
    async fn pump_finishes_countdown_exhausted_in_background() {
        let clock = Arc::new(ManualClock::default());
        let engine = Arc::new(CountdownEngine::with_clock(
            CountdownOptions::new(5.0),
            clock.clone(),
        ));
        let log = Arc::new(LifecycleLog::new());
        let (event_tx, event_rx) = mpsc::channel(16);
        tokio::spawn(lifecycle_pump_task(
            Arc::clone(&engine),
            Arc::clone(&log),
            event_rx,
        ));

        event_tx.send(LifecycleEvent::Background).await.unwrap();
        let marker_log = Arc::clone(&log);
        wait_until(move || marker_log.last().0.as_deref() == Some("background")).await;

        clock.advance_secs(300.0);
        event_tx.send(LifecycleEvent::Foreground).await.unwrap();

        let finished_engine = Arc::clone(&engine);
        wait_until(move || finished_engine.is_finished().unwrap()).await;
        assert_eq!(engine.remaining_seconds().unwrap(), 0.0);
    }
}
