//! Application layer managing state and user workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the [`Session`] owns the loaded table, and [`App`] adds the UI modes and
//! prompts around it.

pub mod session;
pub mod state;

pub use session::*;
pub use state::*;
