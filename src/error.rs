//! Error types for Matchboard
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// Each variant is a distinct, caller-visible condition. Business
/// failures (missing member, missing match, ownership) are never
/// collapsed into one another.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed credentials (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Token signature does not match (401)
    #[error("Invalid signature")]
    InvalidSignature,

    /// Token was valid but has expired (401)
    #[error("Token expired")]
    TokenExpired,

    /// Authenticated identity has no member record (404)
    #[error("유저가 존재하지 않습니다.")]
    MemberNotFound,

    /// Match does not exist (404)
    ///
    /// Carries the message for the lookup that failed; reads and deletes
    /// report different wording to existing clients.
    #[error("{0}")]
    MatchNotFound(&'static str),

    /// Caller is not the owner of the match (403)
    #[error("작성자가 아니기 때문에 삭제할 수 없습니다.")]
    NotMatchOwner,

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// OAuth provider rejected the exchange (401)
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encryption/signing error (500)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::InvalidSignature => "invalid_signature",
            AppError::TokenExpired => "token_expired",
            AppError::MemberNotFound => "member_not_found",
            AppError::MatchNotFound(_) => "match_not_found",
            AppError::NotMatchOwner => "not_match_owner",
            AppError::Validation(_) => "validation",
            AppError::OAuth(_) => "oauth",
            AppError::Database(_) => "database",
            AppError::HttpClient(_) => "http_client",
            AppError::Config(_) => "config",
            AppError::Encryption(_) => "encryption",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message) = match &self {
            AppError::Unauthorized | AppError::InvalidSignature | AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::OAuth(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::MemberNotFound | AppError::MatchNotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            AppError::NotMatchOwner => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Database(error) => {
                tracing::error!(%error, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Config(msg) | AppError::Encryption(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Internal(error) => {
                tracing::error!(%error, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        // Record error metric
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[self.code()]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
