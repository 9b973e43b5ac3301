//! Infrastructure layer providing external service integrations.
//!
//! This module contains spreadsheet file I/O, configuration, the log sink
//! and clipboard access.

pub mod errors;
pub mod persistence;
pub mod config;
pub mod logging;
pub mod clipboard;

pub use errors::*;
pub use persistence::*;
pub use config::*;
pub use logging::*;
pub use clipboard::*;
