//! Integration test utilities for the Wayfarer API
//!
//! Spawns the real router against PostgreSQL and Redis and talks to it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
