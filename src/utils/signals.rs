//! Signal handling for lifecycle transitions and graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::tasks::LifecycleEvent;

/// Forward host lifecycle signals to the event pump.
///
/// SIGUSR1 marks the host as backgrounded, SIGUSR2 as foregrounded again.
pub async fn lifecycle_signal_task(events: mpsc::Sender<LifecycleEvent>) {
    let mut signals = Signals::new(&[
        signal_hook::consts::SIGUSR1,
        signal_hook::consts::SIGUSR2,
    ]).expect("Failed to create lifecycle signal handler");

    while let Some(signal) = signals.next().await {
        let event = match signal {
            signal_hook::consts::SIGUSR1 => LifecycleEvent::Background,
            signal_hook::consts::SIGUSR2 => LifecycleEvent::Foreground,
            _ => continue,
        };
        info!("Received signal {}, forwarding {} event", signal, event);
        if events.send(event).await.is_err() {
            warn!("Lifecycle event channel closed, stopping signal forwarding");
            break;
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = Signals::new(&[
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]).expect("Failed to create signal handler");

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        break;
    }
}
