//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::engine::CountdownOptions;
use crate::presenter::{Labels, PresenterOptions, UnitSelection};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "countdown-engine")]
#[command(about = "A countdown timer service with host lifecycle compensation")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Starting remaining time in seconds (zero or negative starts finished)
    #[arg(short, long, allow_negative_numbers = true)]
    pub initial_seconds: f64,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_interval_ms: u64,

    /// Hide the countdown until the remaining time drops below this many seconds
    #[arg(long)]
    pub visibility_threshold: Option<f64>,

    /// Blink the digits once the countdown finishes
    #[arg(long)]
    pub blink: bool,

    /// Which digit groups to show, as a subset of "DHMS"
    #[arg(long, default_value = "DHMS", value_parser = UnitSelection::parse)]
    pub time_to_show: UnitSelection,

    /// Label shown above the digits while counting down
    #[arg(long)]
    pub counting_label: Option<String>,

    /// Label shown above the digits once the countdown finishes
    #[arg(long)]
    pub finished_label: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "20654")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Engine options derived from the arguments
    pub fn countdown_options(&self) -> CountdownOptions {
        CountdownOptions::new(self.initial_seconds)
            .tick_interval(Duration::from_millis(self.tick_interval_ms))
            .blink(self.blink)
    }

    /// Presenter options derived from the arguments
    pub fn presenter_options(&self) -> PresenterOptions {
        PresenterOptions {
            units: self.time_to_show,
            labels: Labels {
                counting: self.counting_label.clone(),
                finished: self.finished_label.clone(),
                ..Labels::default()
            },
            visibility_threshold: self.visibility_threshold,
        }
    }
}
