//! Countdown Engine - A countdown timer that survives host suspension
//!
//! This library provides a countdown state machine driven by injected clock
//! and scheduler capabilities, a presenter that renders the remaining time as
//! day/hour/minute/second digit groups, and the HTTP surface that exposes
//! both to display clients.

pub mod config;
pub mod engine;
pub mod presenter;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CountdownEngine, CountdownOptions, TimeLeft};
pub use presenter::{Presenter, PresenterOptions};
pub use api::{create_router, ApiContext};
pub use utils::signals::shutdown_signal;
