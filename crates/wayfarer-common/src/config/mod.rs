//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    OutboxConfig, RateLimitConfig, RedisConfig, RetryConfig, ServerConfig, SnowflakeConfig,
    ThreadConfig,
};
