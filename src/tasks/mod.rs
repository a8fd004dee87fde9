//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod lifecycle;

// Re-export main functions
pub use lifecycle::{lifecycle_pump_task, LifecycleEvent, LifecycleLog};
