//! Presentation module
//!
//! This module turns countdown snapshots into the display model served to
//! clients: selected digit groups, labels, visibility, and blink blanking.

pub mod format;
pub mod view;

// Re-export main types
pub use format::UnitSelection;
pub use view::{CountdownView, DigitGroup, Labels, Presenter, PresenterOptions};
