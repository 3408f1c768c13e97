//! Matchboard - match bulletin board backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Match board endpoints                                    │
//! │  - GitHub OAuth login                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Ownership rules for matches                              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx)                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `service`: Business logic layer
//! - `data`: Database layer and storage contracts
//! - `auth`: GitHub OAuth and session tokens
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod service;

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Session token issuer/verifier
    pub tokens: Arc<auth::SessionTokenProvider>,

    /// OAuth provider used by the login flow
    pub oauth: Arc<dyn auth::OAuthProvider>,

    /// Match business logic
    pub matches: Arc<service::MatchService>,
}

impl AppState {
    /// Initialize application state with the GitHub OAuth provider
    ///
    /// # Errors
    /// Returns error if the HTTP client or database cannot be initialized
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let http_client = reqwest::Client::builder()
            .user_agent("Matchboard/0.1.0")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;

        let oauth = auth::GitHubOAuthProvider::new(
            http_client,
            config.auth.github.clone(),
            &config.server.base_url(),
        );

        Self::with_oauth_provider(config, Arc::new(oauth)).await
    }

    /// Initialize application state with an explicit OAuth provider
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Build token provider from auth config
    /// 3. Wire match service to the database
    pub async fn with_oauth_provider(
        config: config::AppConfig,
        oauth: Arc<dyn auth::OAuthProvider>,
    ) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = Arc::new(data::Database::connect(&config.database.path).await?);

        let tokens = Arc::new(auth::SessionTokenProvider::new(auth::TokenConfig::from(
            &config.auth,
        )));

        let matches = Arc::new(service::MatchService::new(db.clone(), db.clone()));

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db,
            tokens,
            oauth,
            matches,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::metrics_router())
        .nest("/api", api::matches_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.protocol.eq_ignore_ascii_case("https") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server base URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
