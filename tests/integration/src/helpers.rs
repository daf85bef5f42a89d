//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, seeding accounts, and making
//! authenticated HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use wayfarer_api::server::{create_app, create_app_state};
use wayfarer_api::state::AppState;
use wayfarer_common::{AppConfig, OutboxConfig};
use wayfarer_core::{Role, Snowflake, User};
use wayfarer_service::NotificationRelay;

/// A seeded account and a bearer token for it
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Snowflake,
    pub token: String,
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    outbox: OutboxConfig,
    shutdown: watch::Sender<bool>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let outbox = config.outbox;
        let state = create_app_state(config).await?;
        let app = create_app(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            addr,
            client,
            state,
            outbox,
            shutdown,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a fresh account directly and mint a token for it
    pub async fn seed_user(&self, role: Role) -> Result<TestUser> {
        let ctx = self.state.service_context();
        let id = ctx.generate_id();
        let mut user = User::new(id, format!("Traveler {id}"), format!("traveler{id}@example.com"));
        user.role = role;
        ctx.user_repo().create(&user).await?;

        let token = self.state.jwt_service().issue(id, role)?;
        Ok(TestUser { id, token })
    }

    /// Run the outbox relay in the background until the server is dropped
    pub fn spawn_relay(&self) -> JoinHandle<()> {
        let relay = NotificationRelay::new(self.state.service_context().clone(), &self.outbox);
        tokio::spawn(relay.run(self.shutdown.subscribe()))
    }

    fn request(&self, method: reqwest::Method, path: &str, user: Option<&TestUser>) -> RequestBuilder {
        let url = format!("{}/api/v1{}", self.base_url(), path);
        let builder = self.client.request(method, url);
        match user {
            Some(user) => builder.bearer_auth(&user.token),
            None => builder,
        }
    }

    /// GET an unversioned path such as `/health`
    pub async fn get_raw(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(url).send().await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.request(reqwest::Method::GET, path, None).send().await?)
    }

    pub async fn get_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(self.request(reqwest::Method::GET, path, Some(user)).send().await?)
    }

    pub async fn post_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::POST, path, Some(user))
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::PUT, path, Some(user))
            .json(body)
            .send()
            .await?)
    }

    pub async fn patch_auth<T: Serialize>(&self, path: &str, user: &TestUser, body: &T) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::PATCH, path, Some(user))
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, user: &TestUser) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::DELETE, path, Some(user))
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    if std::env::var("API_PORT").is_err() {
        std::env::set_var("API_PORT", "0");
    }
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret-that-is-long-enough");
    }

    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.outbox.poll_interval_ms = 50;
    config.rate_limit.requests_per_second = 1_000;
    config.rate_limit.burst = 1_000;
    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    if std::env::var("REDIS_URL").is_err() {
        eprintln!("Skipping test: REDIS_URL not set");
        return false;
    }

    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response's status and `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode, expected_code: &str) -> Result<()> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    let code = body["error"]["code"].as_str().unwrap_or_default();
    anyhow::ensure!(code == expected_code, "Expected error code {expected_code}, got {code}");
    Ok(())
}
