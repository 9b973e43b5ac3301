//! Presentation layer handling terminal UI and user input.
//!
//! Renders the filter sidebar, the record detail and workflow panels and
//! the popups with ratatui, and maps key presses onto [`crate::App`] actions.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
