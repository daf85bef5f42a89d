//! Model to entity mappers
//!
//! - `From<Model> for Entity` where every column maps infallibly
//! - `TryFrom<Model> for Entity` where a text column must parse into a domain enum

mod comment;
mod notification;
mod post;
mod travel;
mod user;
mod vote;

use wayfarer_core::DomainError;

/// A text column held a value the domain enum does not know
fn unknown_value(column: &str, value: &str) -> DomainError {
    DomainError::DatabaseError(format!("unexpected {column} value: {value}"))
}
