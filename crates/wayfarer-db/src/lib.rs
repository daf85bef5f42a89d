//! # wayfarer-db
//!
//! Database layer implementing the `wayfarer-core` storage traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Read repositories and the [`PgTransactionalStore`], the only writer of edges and counters
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wayfarer_db::{create_pool, run_migrations, DatabaseConfig, PgTransactionalStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::default();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, &config.migrations_dir).await?;
//!     let store = PgTransactionalStore::new(pool);
//!
//!     // Open transactions through the store...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{bundled_migrations_dir, create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgCommentRepository, PgFollowRepository, PgNotificationRepository, PgOutboxRepository,
    PgPostRepository, PgSavedPostRepository, PgStoreTx, PgTransactionalStore,
    PgTravelPlanRepository, PgTravelRequestRepository, PgUserRepository, PgVoteRepository,
};
