//! leadsheet - record review library
//!
//! Load a spreadsheet of business leads, filter and page through it, tag each
//! row with a verification status, an evaluation tier and comments, then
//! export the annotated table.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
