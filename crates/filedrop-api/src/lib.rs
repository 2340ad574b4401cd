//! Filedrop API Library
//!
//! HTTP handlers, upload services, middleware and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

#[cfg(test)]
mod test_helpers;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
