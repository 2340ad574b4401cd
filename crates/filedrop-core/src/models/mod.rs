//! Data models for the application
//!
//! Upload batches, per-file records and their HTTP views.

mod upload;

pub use upload::*;
