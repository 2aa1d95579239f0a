//! Middleware module
//!
//! Request extractors and layers shared by the HTTP handlers

pub mod auth;
pub mod logging;

pub use auth::{AdminUser, RequireEventManager};
pub use logging::trace_layer;
