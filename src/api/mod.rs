//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::engine::CountdownEngine;
use crate::presenter::Presenter;
use crate::tasks::LifecycleLog;
use handlers::*;

/// Shared context for the HTTP endpoints
pub struct ApiContext {
    /// The countdown engine this service runs
    pub engine: Arc<CountdownEngine>,
    /// Renders snapshots for display clients
    pub presenter: Presenter,
    /// Record of the most recent lifecycle event
    pub lifecycle: Arc<LifecycleLog>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl ApiContext {
    /// Create a new context
    pub fn new(
        engine: Arc<CountdownEngine>,
        presenter: Presenter,
        lifecycle: Arc<LifecycleLog>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            engine,
            presenter,
            lifecycle,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Create the HTTP router with all endpoints
pub fn create_router(context: Arc<ApiContext>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/background", post(background_handler))
        .route("/foreground", post(foreground_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}
