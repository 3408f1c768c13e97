//! GitHub OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with GitHub. The
//! provider call itself sits behind [`OAuthProvider`] so the HTTP routes
//! can run against a fake in tests.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::{Rng, distributions::Alphanumeric};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::config::GitHubOAuthConfig;
use crate::data::MemberId;
use crate::error::AppError;
use crate::metrics::LOGINS_TOTAL;

pub(crate) const SESSION_COOKIE: &str = "session";
const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_STATE_LENGTH: usize = 32;
const GITHUB_SCOPE: &str = "read:user";

/// Identity reported by the OAuth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    /// Provider-side numeric user id
    pub id: i64,
    /// Provider-side login name
    pub login: String,
}

/// OAuth provider used during login
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to, carrying the CSRF `state`
    fn authorize_url(&self, state: &str) -> Result<String, AppError>;

    /// Exchange an authorization code for a provider access token
    async fn exchange_code(&self, code: &str) -> Result<String, AppError>;

    /// Resolve the provider access token to the signed-in user
    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, AppError>;
}

/// Body of the GitHub code-for-token exchange
#[derive(Debug, Serialize)]
struct GitHubAccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

/// GitHub token response
///
/// GitHub answers 200 with an `error` field when the code is rejected.
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GitHub user info
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
}

/// GitHub implementation of [`OAuthProvider`]
pub struct GitHubOAuthProvider {
    client: reqwest::Client,
    config: GitHubOAuthConfig,
    redirect_uri: String,
}

impl GitHubOAuthProvider {
    /// # Arguments
    /// * `client` - shared HTTP client (timeouts are configured there)
    /// * `config` - GitHub application credentials and endpoints
    /// * `base_url` - public URL of this server, used for the callback
    pub fn new(client: reqwest::Client, config: GitHubOAuthConfig, base_url: &str) -> Self {
        let redirect_uri = format!("{}/auth/github/callback", base_url.trim_end_matches('/'));
        Self {
            client,
            config,
            redirect_uri,
        }
    }
}

#[async_trait]
impl OAuthProvider for GitHubOAuthProvider {
    fn authorize_url(&self, state: &str) -> Result<String, AppError> {
        let url = url::Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", GITHUB_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| AppError::Config(format!("auth.github.authorize_url is invalid: {e}")))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        let request = GitHubAccessTokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            code,
        };

        let response: GitHubTokenResponse = self
            .client
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            let message = response.error_description.unwrap_or(error);
            return Err(AppError::OAuth(message));
        }

        response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::OAuth("token response has no access_token".to_string()))
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<ProviderIdentity, AppError> {
        let url = format!("{}/user", self.config.api_base_url.trim_end_matches('/'));

        let user: GitHubUser = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(ProviderIdentity {
            id: user.id,
            login: user.login,
        })
    }
}

/// Create authentication router
///
/// Routes:
/// - GET /auth/github - Redirect to GitHub
/// - GET /auth/github/callback - OAuth callback
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/github", get(github_redirect))
        .route("/auth/github/callback", get(github_callback))
        .route("/logout", post(logout))
}

// =============================================================================
// GitHub OAuth
// =============================================================================

/// GET /auth/github
///
/// Redirects user to GitHub authorization page.
///
/// # Steps
/// 1. Generate CSRF state token
/// 2. Store state in cookie
/// 3. Redirect to GitHub with client_id, redirect_uri, scope, state
async fn github_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let csrf_state = generate_csrf_state();
    let location = state.oauth.authorize_url(&csrf_state)?;

    let cookie = Cookie::build((OAUTH_STATE_COOKIE, csrf_state))
        .http_only(true)
        .secure(state.config.should_use_secure_cookies())
        .same_site(SameSite::Lax)
        .path("/");

    Ok((jar.add(cookie), Redirect::to(&location)))
}

/// Query parameters from GitHub callback
#[derive(Debug, Deserialize)]
struct GitHubCallbackQuery {
    /// Authorization code
    code: String,
    /// CSRF state token
    state: String,
}

/// Successful login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub member_id: MemberId,
}

/// GET /auth/github/callback
///
/// Handles OAuth callback from GitHub.
///
/// # Steps
/// 1. Verify CSRF state
/// 2. Exchange code for access token
/// 3. Fetch user info from GitHub
/// 4. Register or refresh the member
/// 5. Issue session token and set cookie
async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<GitHubCallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    match complete_login(&state, &query, &jar).await {
        Ok(login) => {
            LOGINS_TOTAL.with_label_values(&["success"]).inc();

            let session_cookie = Cookie::build((SESSION_COOKIE, login.access_token.clone()))
                .http_only(true)
                .secure(state.config.should_use_secure_cookies())
                .same_site(SameSite::Lax)
                .path("/");
            let jar = jar
                .remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/"))
                .add(session_cookie);

            Ok((jar, Json(login)))
        }
        Err(error) => {
            LOGINS_TOTAL.with_label_values(&["failure"]).inc();
            tracing::warn!(%error, "GitHub login failed");
            Err(error)
        }
    }
}

async fn complete_login(
    state: &AppState,
    query: &GitHubCallbackQuery,
    jar: &CookieJar,
) -> Result<LoginResponse, AppError> {
    verify_csrf_state(&query.state, jar)?;

    let provider_token = state.oauth.exchange_code(&query.code).await?;
    let identity = state.oauth.fetch_identity(&provider_token).await?;
    let member = state
        .db
        .upsert_github_member(identity.id, &identity.login)
        .await?;
    let access_token = state.tokens.issue(member.id)?;

    tracing::info!(
        member_id = member.id,
        login = %member.login,
        "Member signed in"
    );

    Ok(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.max_age().num_seconds(),
        member_id: member.id,
    })
}

// =============================================================================
// Logout
// =============================================================================

/// POST /logout
///
/// Clears session and CSRF cookies.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(Cookie::build((SESSION_COOKIE, "")).path("/"))
        .remove(Cookie::build((OAUTH_STATE_COOKIE, "")).path("/"));

    (jar, StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Generate a random CSRF state token
fn generate_csrf_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(OAUTH_STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Verify CSRF state from cookie matches callback state
fn verify_csrf_state(state: &str, jar: &CookieJar) -> Result<(), AppError> {
    let expected = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value())
        .ok_or(AppError::Unauthorized)?;

    if state.is_empty() || expected != state {
        return Err(AppError::Unauthorized);
    }

    Ok(())
}
