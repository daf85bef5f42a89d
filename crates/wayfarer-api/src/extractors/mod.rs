//! Axum extractors for request handling
//!
//! Custom extractors for authentication, ids in the path, validation, pagination, and feed order.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::AuthUser;
pub use pagination::{FeedSort, PagePagination, PaginationParams};
pub use path::IdPath;
pub use validated::ValidatedJson;
