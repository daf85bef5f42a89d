//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the token validator, and the pools the readiness check pings.

use std::sync::Arc;

use wayfarer_cache::RedisPool;
use wayfarer_common::{AppConfig, JwtService};
use wayfarer_db::PgPool;
use wayfarer_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: ServiceContext,
    config: Arc<AppConfig>,
    jwt_service: Arc<JwtService>,
    pool: PgPool,
    redis_pool: RedisPool,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        jwt_service: Arc<JwtService>,
        pool: PgPool,
        redis_pool: RedisPool,
    ) -> Self {
        Self {
            service_context,
            config: Arc::new(config),
            jwt_service,
            pool,
            redis_pool,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn redis_pool(&self) -> &RedisPool {
        &self.redis_pool
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .finish_non_exhaustive()
    }
}
