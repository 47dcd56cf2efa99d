//! Intake API Library
//!
//! HTTP handlers, middleware, and application setup for the craftsman
//! registration intake service.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod utils;

pub use error::{ErrorBody, HttpAppError};
pub use state::AppState;
