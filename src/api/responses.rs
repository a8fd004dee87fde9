//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::CountdownSnapshot;
use crate::presenter::CountdownView;

/// API response structure for the lifecycle endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub countdown: CountdownSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, countdown: CountdownSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            countdown,
        }
    }

    /// Create a response for a countdown that is still running
    pub fn running(message: String, countdown: CountdownSnapshot) -> Self {
        Self::new("running".to_string(), message, countdown)
    }

    /// Create a response for a countdown that has finished
    pub fn finished(message: String, countdown: CountdownSnapshot) -> Self {
        Self::new("finished".to_string(), message, countdown)
    }

    /// Create a response with the status taken from the snapshot
    pub fn for_snapshot(message: String, countdown: CountdownSnapshot) -> Self {
        if countdown.finished {
            Self::finished(message, countdown)
        } else {
            Self::running(message, countdown)
        }
    }
}

/// Status response with the rendered view for display clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countdown: CountdownSnapshot,
    /// Whether the countdown has counted down into the visible range
    pub visible: bool,
    /// Rendered digit groups and labels; `null` while the countdown is hidden
    pub view: Option<CountdownView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_lifecycle_event: Option<String>,
    pub last_lifecycle_event_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        }
    }
}
