//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::tasks::LifecycleEvent;

use super::responses::{ApiResponse, HealthResponse, StatusResponse};
use super::ApiContext;

/// Handle POST /background - Record that the host went to background
pub async fn background_handler(
    State(context): State<Arc<ApiContext>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match context.engine.on_background() {
        Ok(countdown) => {
            info!("Background endpoint called - suspend marker recorded");
            context.lifecycle.record(LifecycleEvent::Background);
            Ok(Json(ApiResponse::for_snapshot(
                "Background transition recorded".to_string(),
                countdown,
            )))
        }
        Err(e) => {
            error!("Failed to record background transition: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /foreground - Apply resume compensation for the background period
pub async fn foreground_handler(
    State(context): State<Arc<ApiContext>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match context.engine.on_foreground() {
        Ok(countdown) => {
            info!(
                "Foreground endpoint called - {:.3}s remaining after compensation",
                countdown.remaining_seconds
            );
            context.lifecycle.record(LifecycleEvent::Foreground);
            Ok(Json(ApiResponse::for_snapshot(
                "Foreground transition applied".to_string(),
                countdown,
            )))
        }
        Err(e) => {
            error!("Failed to apply foreground transition: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the countdown snapshot and rendered view
pub async fn status_handler(
    State(context): State<Arc<ApiContext>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let countdown = match context.engine.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get countdown snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let visible = context.presenter.is_visible(&countdown);
    let view = context.presenter.render(&countdown);
    let (last_lifecycle_event, last_lifecycle_event_time) = context.lifecycle.last();

    Ok(Json(StatusResponse {
        countdown,
        visible,
        view,
        uptime: context.get_uptime(),
        port: context.port,
        host: context.host.clone(),
        last_lifecycle_event,
        last_lifecycle_event_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
