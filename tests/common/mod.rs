//! Common test utilities for E2E tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use matchboard::auth::{OAuthProvider, ProviderIdentity};
use matchboard::error::AppError;
use matchboard::{AppState, config};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const VALID_CODE: &str = "valid-code";
pub const GITHUB_ID: i64 = 4242;
pub const GITHUB_LOGIN: &str = "octocat";

/// OAuth provider that accepts a single fixed code
pub struct FakeOAuthProvider;

#[async_trait]
impl OAuthProvider for FakeOAuthProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        Ok(format!(
            "https://github.com/login/oauth/authorize?client_id=test-client-id&scope=read%3Auser&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        if code == VALID_CODE {
            Ok("gho_test_access_token".to_string())
        } else {
            Err(AppError::OAuth("bad_verification_code".to_string()))
        }
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, AppError> {
        assert_eq!(access_token, "gho_test_access_token");
        Ok(ProviderIdentity {
            id: GITHUB_ID,
            login: GITHUB_LOGIN.to_string(),
        })
    }
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a test server wired to the real GitHub provider
    ///
    /// The provider only builds URLs here; no request reaches GitHub.
    pub async fn new() -> Self {
        Self::start(None).await
    }

    /// Create a test server whose login flow uses [`FakeOAuthProvider`]
    pub async fn with_fake_oauth() -> Self {
        Self::start(Some(Arc::new(FakeOAuthProvider))).await
    }

    async fn start(oauth: Option<Arc<dyn OAuthProvider>>) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = test_config(db_path);

        matchboard::metrics::init_metrics();

        let state = match oauth {
            Some(provider) => AppState::with_oauth_provider(config, provider)
                .await
                .unwrap(),
            None => AppState::new(config).await.unwrap(),
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = matchboard::build_router(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register a member directly in the database
    pub async fn create_test_member(&self, github_id: i64) -> matchboard::data::Member {
        self.state
            .db
            .upsert_github_member(github_id, &format!("member-{github_id}"))
            .await
            .unwrap()
    }

    /// Issue a session token for any member id
    pub fn token_for(&self, member_id: i64) -> String {
        self.state
            .tokens
            .issue(member_id)
            .expect("Failed to create test token")
    }
}

fn test_config(db_path: std::path::PathBuf) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            domain: "test.example.com".to_string(),
            protocol: "https".to_string(),
        },
        database: config::DatabaseConfig { path: db_path },
        auth: config::AuthConfig {
            session_secret: "test-secret-key-32-bytes-long!!!".to_string(),
            session_max_age: 604800,
            github: config::GitHubOAuthConfig {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
                authorize_url: "https://github.com/login/oauth/authorize".to_string(),
                token_url: "https://github.com/login/oauth/access_token".to_string(),
                api_base_url: "https://api.github.com".to_string(),
            },
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}
