//! Server setup and initialization
//!
//! Wires the Postgres repositories, the transactional store, and the Redis
//! sink into a service context, then serves the router next to the outbox relay.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

use wayfarer_cache::{RedisNotificationSink, RedisPool};
use wayfarer_common::{AppConfig, AppError, JwtService};
use wayfarer_core::{SnowflakeGenerator, ThreadRules};
use wayfarer_db::{
    create_pool, run_migrations, PgCommentRepository, PgFollowRepository, PgNotificationRepository,
    PgOutboxRepository, PgPostRepository, PgSavedPostRepository, PgTransactionalStore,
    PgTravelPlanRepository, PgTravelRequestRepository, PgUserRepository, PgVoteRepository,
};
use wayfarer_service::{NotificationRelay, RetryPolicy, ServiceContextBuilder};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health checks sit outside the rate limiter.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    api.merge(health_routes()).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = wayfarer_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool, &db_config.migrations_dir)
        .await
        .map_err(|e| AppError::Database(format!("migrations failed: {e}")))?;
    info!("Migrations applied");

    info!("Connecting to Redis...");
    let redis_pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .vote_repo(Arc::new(PgVoteRepository::new(pool.clone())))
        .follow_repo(Arc::new(PgFollowRepository::new(pool.clone())))
        .saved_post_repo(Arc::new(PgSavedPostRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .travel_plan_repo(Arc::new(PgTravelPlanRepository::new(pool.clone())))
        .travel_request_repo(Arc::new(PgTravelRequestRepository::new(pool.clone())))
        .notification_repo(Arc::new(PgNotificationRepository::new(pool.clone())))
        .outbox_repo(Arc::new(PgOutboxRepository::new(pool.clone())))
        .store(Arc::new(PgTransactionalStore::new(pool.clone())))
        .sink(Arc::new(RedisNotificationSink::new(redis_pool.clone())))
        .snowflake_generator(snowflake_generator)
        .thread_rules(ThreadRules::new(config.thread.max_depth, config.thread.preview_limit))
        .retry_policy(RetryPolicy::from(&config.retry))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, jwt_service, pool, redis_pool))
}

/// Run the HTTP server until ctrl-c
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid API address: {e}")))?;
    let outbox = config.outbox;

    let state = create_app_state(config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay = NotificationRelay::new(state.service_context().clone(), &outbox);
    let relay_handle = tokio::spawn(relay.run(shutdown_rx));

    let app = create_app(state);
    let served = run_server(app, addr).await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = relay_handle.await {
        warn!(error = %e, "Outbox relay task failed");
    }

    served
}
