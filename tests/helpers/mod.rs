//! Test helpers module
//!
//! Shared setup for the integration tests: an in-memory application context,
//! generated registrants and a PostgreSQL test database.

#![allow(dead_code)]

pub mod database_helper;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use test_context::*;
pub use test_data::*;
