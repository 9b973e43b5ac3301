//! Record model, filtering, navigation and row editing.
//!
//! Nothing in this layer performs I/O or fails; file formats live in
//! `infrastructure` and the interactive session in `application`.

pub mod models;
pub mod table;
pub mod filter;
pub mod cursor;
pub mod editor;
pub mod stats;
pub mod website;

pub use models::*;
pub use table::*;
pub use filter::*;
pub use cursor::*;
pub use editor::*;
pub use stats::*;
pub use website::*;
