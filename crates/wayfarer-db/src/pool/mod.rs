//! Database connection pool management

mod postgres;

pub use postgres::{bundled_migrations_dir, create_pool, run_migrations, DatabaseConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
