//! GitHub OAuth authentication
//!
//! Handles:
//! - GitHub OAuth flow
//! - Session token issuing and verification
//! - Caller extraction for protected routes

mod middleware;
mod oauth;
pub mod session;

pub use middleware::CurrentUser;
pub use oauth::{GitHubOAuthProvider, LoginResponse, OAuthProvider, ProviderIdentity, auth_router};
pub use session::{
    Caller, Session, SessionTokenProvider, TokenConfig, TokenProvider, resolve_caller,
};

#[cfg(test)]
pub(crate) use session::MockTokenProvider;
