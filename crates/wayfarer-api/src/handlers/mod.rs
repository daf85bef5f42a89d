//! Route handlers
//!
//! Thin adapters from HTTP to the service layer, organized by resource.

pub mod comments;
pub mod health;
pub mod notifications;
pub mod posts;
pub mod travel;
pub mod users;
