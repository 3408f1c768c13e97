//! Authentication extractor
//!
//! Resolves the caller of protected routes from a bearer token or the
//! session cookie.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, request::Parts},
};
use axum_extra::extract::CookieJar;

use super::oauth::SESSION_COOKIE;
use super::session::{Caller, resolve_caller};
use crate::AppState;
use crate::error::AppError;

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(ToOwned::to_owned)
        .or_else(|| {
            let jar = CookieJar::from_headers(headers);
            jar.get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_owned())
        })
}

/// Extractor for current authenticated member
///
/// Rejects the request before the handler runs when the token is missing,
/// malformed, tampered with, or expired.
///
/// # Usage
/// ```ignore
/// async fn handler(
///     CurrentUser(caller): CurrentUser,
/// ) -> impl IntoResponse {
///     format!("Hello, member {}", caller.member_id())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(caller) = parts.extensions.get::<Caller>().copied() {
            return Ok(CurrentUser(caller));
        }

        let state = AppState::from_ref(state);
        let token = extract_token_from_headers(&parts.headers).ok_or(AppError::Unauthorized)?;
        let caller = resolve_caller(state.tokens.as_ref(), &token)?;
        parts.extensions.insert(caller);

        Ok(CurrentUser(caller))
    }
}
