//! Countdown Engine - A countdown timer that survives host suspension
//!
//! This is the main entry point for the countdown-engine service.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

use countdown_engine::{
    config::Config,
    engine::{CountdownEngine, TokioScheduler},
    presenter::Presenter,
    api::{create_router, ApiContext},
    tasks::{lifecycle_pump_task, LifecycleLog},
    utils::signals::{lifecycle_signal_task, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "countdown_engine={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting countdown-engine server v0.1.0");
    info!(
        "Configuration: host={}, port={}, initial={}s, tick={}ms",
        config.host, config.port, config.initial_seconds, config.tick_interval_ms
    );

    // Build the engine and arm its tick (and blink) schedules
    let engine = Arc::new(CountdownEngine::new(config.countdown_options()));
    engine
        .on_finish(|| info!("Countdown reached zero"))
        .map_err(anyhow::Error::msg)?;
    engine
        .on_tick(|time_left| debug!("Tick: {} remaining", time_left))
        .map_err(anyhow::Error::msg)?;
    engine.start(&TokioScheduler).map_err(anyhow::Error::msg)?;

    // Wire host lifecycle signals to the engine through the event pump
    let lifecycle = Arc::new(LifecycleLog::new());
    let (event_tx, event_rx) = mpsc::channel(16);
    tokio::spawn(lifecycle_pump_task(
        Arc::clone(&engine),
        Arc::clone(&lifecycle),
        event_rx,
    ));
    tokio::spawn(lifecycle_signal_task(event_tx));

    // Create HTTP router with all endpoints
    let presenter = Presenter::new(config.presenter_options());
    let context = Arc::new(ApiContext::new(
        Arc::clone(&engine),
        presenter,
        Arc::clone(&lifecycle),
        config.port,
        config.host.clone(),
    ));
    let app = create_router(context);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status     - Countdown snapshot and rendered view");
    info!("  GET  /health     - Health check");
    info!("  POST /background - Record a host background transition");
    info!("  POST /foreground - Apply resume compensation");
    info!("Signals: SIGUSR1=background, SIGUSR2=foreground");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // Release the tick and blink schedules before exit
    if let Err(e) = engine.stop() {
        tracing::error!("Failed to stop countdown schedules: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
