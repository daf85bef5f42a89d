//! Application configuration structs
//!
//! Loaded from environment variables (with an optional `.env` file).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub thread: ThreadConfig,
    pub retry: RetryConfig,
    pub outbox: OutboxConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Per-statement timeout applied to every pooled connection
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    /// Directory holding the `.sql` migrations; unset means the copy bundled with the db crate
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Comment thread shape
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ThreadConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: i32,
    #[serde(default = "default_preview_limit")]
    pub preview_limit: i64,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            preview_limit: default_preview_limit(),
        }
    }
}

/// Bounded retry of operations that lost a race on the same edge
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_attempts(),
            base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

/// Notification outbox relay
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OutboxConfig {
    #[serde(default = "default_outbox_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_outbox_batch_size")]
    pub batch_size: i64,
    #[serde(default = "default_outbox_max_attempts")]
    pub max_attempts: i32,
    #[serde(default = "default_outbox_lease_secs")]
    pub lease_secs: u64,
}

impl OutboxConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn lease(&self) -> Duration {
        Duration::from_secs(self.lease_secs)
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_outbox_poll_interval_ms(),
            batch_size: default_outbox_batch_size(),
            max_attempts: default_outbox_max_attempts(),
            lease_secs: default_outbox_lease_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "wayfarer".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_max_depth() -> i32 {
    2
}

fn default_preview_limit() -> i64 {
    3
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    15
}

fn default_outbox_poll_interval_ms() -> u64 {
    500
}

fn default_outbox_batch_size() -> i64 {
    50
}

fn default_outbox_max_attempts() -> i32 {
    5
}

fn default_outbox_lease_secs() -> u64 {
    30
}

/// Parse an optional variable; unset falls back to `default`, set-but-invalid is an error
fn var_or<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: required("API_PORT")?
                    .parse()
                    .map_err(|_| ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: var_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: var_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
                statement_timeout_ms: var_or(
                    "DATABASE_STATEMENT_TIMEOUT_MS",
                    default_statement_timeout_ms,
                )?,
                migrations_dir: env::var("DATABASE_MIGRATIONS_DIR")
                    .ok()
                    .filter(|dir| !dir.trim().is_empty()),
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: var_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
            },
            jwt: JwtConfig {
                secret: required("JWT_SECRET")?,
                access_token_expiry: var_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: var_or(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                )?,
                burst: var_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: var_or("WORKER_ID", || 0)?,
            },
            thread: ThreadConfig {
                max_depth: var_or("THREAD_MAX_DEPTH", default_max_depth)?,
                preview_limit: var_or("THREAD_PREVIEW_LIMIT", default_preview_limit)?,
            },
            retry: RetryConfig {
                max_attempts: var_or("RETRY_MAX_ATTEMPTS", default_retry_attempts)?,
                base_delay_ms: var_or("RETRY_BASE_DELAY_MS", default_retry_base_delay_ms)?,
            },
            outbox: OutboxConfig {
                poll_interval_ms: var_or("OUTBOX_POLL_INTERVAL_MS", default_outbox_poll_interval_ms)?,
                batch_size: var_or("OUTBOX_BATCH_SIZE", default_outbox_batch_size)?,
                max_attempts: var_or("OUTBOX_MAX_ATTEMPTS", default_outbox_max_attempts)?,
                lease_secs: var_or("OUTBOX_LEASE_SECS", default_outbox_lease_secs)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                self.snowflake.worker_id.to_string(),
            ));
        }
        if self.thread.max_depth < 0 {
            return Err(ConfigError::InvalidValue(
                "THREAD_MAX_DEPTH",
                self.thread.max_depth.to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue("RETRY_MAX_ATTEMPTS", "0".to_string()));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("PRODUCTION"), Some(Environment::Production));
        assert_eq!(Environment::parse("qa"), None);
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_interaction_defaults() {
        let thread = ThreadConfig::default();
        assert_eq!(thread.max_depth, 2);
        assert_eq!(thread.preview_limit, 3);

        let retry = RetryConfig::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.base_delay(), Duration::from_millis(15));

        let outbox = OutboxConfig::default();
        assert_eq!(outbox.batch_size, 50);
        assert_eq!(outbox.lease(), Duration::from_secs(30));
    }

    #[test]
    fn test_var_or_falls_back_when_unset() {
        let value: u32 = var_or("WAYFARER_TEST_SURELY_UNSET_VAR", || 7).unwrap();
        assert_eq!(value, 7);
    }
}
