//! Session tokens
//!
//! Uses HMAC-signed tokens carried in a cookie or bearer header.
//! No server-side session storage needed.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::AuthConfig;
use crate::data::MemberId;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Signing configuration for session tokens
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret key
    pub secret: String,
    /// Lifetime of issued tokens
    pub max_age: Duration,
}

impl From<&AuthConfig> for TokenConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.session_secret.clone(),
            max_age: Duration::seconds(auth.session_max_age),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// Signed session payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Member the token was issued to
    pub member_id: MemberId,
    /// When session was created
    pub issued_at: DateTime<Utc>,
    /// When session expires
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Check if session is expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Resolves an opaque session token to a member identity
///
/// Implementations verify without touching the store.
#[cfg_attr(test, mockall::automock)]
pub trait TokenProvider: Send + Sync {
    /// Verify `token` and return the member id it was issued to
    ///
    /// # Errors
    /// - `AppError::Unauthorized` for malformed tokens
    /// - `AppError::InvalidSignature` when the signature does not match
    /// - `AppError::TokenExpired` when the token is past its expiry
    fn get_user_id(&self, token: &str) -> Result<MemberId, AppError>;
}

/// HMAC-SHA256 session token provider
///
/// Token format: base64(payload).base64(hmac_sha256(payload))
#[derive(Debug, Clone)]
pub struct SessionTokenProvider {
    config: TokenConfig,
}

impl SessionTokenProvider {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Lifetime of issued tokens
    pub fn max_age(&self) -> Duration {
        self.config.max_age
    }

    /// Issue a token for `member_id` valid for the configured max age
    pub fn issue(&self, member_id: MemberId) -> Result<String, AppError> {
        let now = Utc::now();
        self.sign(&Session {
            member_id,
            issued_at: now,
            expires_at: now + self.config.max_age,
        })
    }

    /// Sign an arbitrary session payload
    pub fn sign(&self, session: &Session) -> Result<String, AppError> {
        let payload = serde_json::to_string(session).map_err(|e| AppError::Internal(e.into()))?;
        let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

        let mut mac = self.mac()?;
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{}.{}", payload_b64, signature_b64))
    }

    /// Verify and decode a token
    ///
    /// # Errors
    /// Same as [`TokenProvider::get_user_id`].
    pub fn verify(&self, token: &str) -> Result<Session, AppError> {
        // 1. Split token into payload and signature
        let (payload_b64, signature_b64) =
            token.split_once('.').ok_or(AppError::Unauthorized)?;
        if payload_b64.is_empty() || signature_b64.contains('.') {
            return Err(AppError::Unauthorized);
        }

        // 2. Verify HMAC signature
        let signature = general_purpose::URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let mut mac = self.mac()?;
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AppError::InvalidSignature)?;

        // 3. Decode and deserialize payload
        let payload_bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AppError::Unauthorized)?;
        let session: Session =
            serde_json::from_slice(&payload_bytes).map_err(|_| AppError::Unauthorized)?;

        // 4. Check if session is expired
        if session.is_expired() {
            return Err(AppError::TokenExpired);
        }

        Ok(session)
    }

    fn mac(&self) -> Result<HmacSha256, AppError> {
        HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| AppError::Encryption(e.to_string()))
    }
}

impl TokenProvider for SessionTokenProvider {
    fn get_user_id(&self, token: &str) -> Result<MemberId, AppError> {
        self.verify(token).map(|session| session.member_id)
    }
}

/// An identity obtained by verifying a session token
///
/// Cannot be built from a bare id, so every service call that takes a
/// `Caller` authorizes against the token-derived identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    member_id: MemberId,
}

impl Caller {
    pub fn member_id(&self) -> MemberId {
        self.member_id
    }
}

/// Resolve a raw token into a [`Caller`]
pub fn resolve_caller(tokens: &dyn TokenProvider, token: &str) -> Result<Caller, AppError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }

    let member_id = tokens.get_user_id(token)?;
    Ok(Caller { member_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(secret: &str) -> SessionTokenProvider {
        SessionTokenProvider::new(TokenConfig {
            secret: secret.to_string(),
            max_age: Duration::days(7),
        })
    }

    #[test]
    fn issued_token_resolves_to_member() {
        let tokens = provider("test-secret-key-32-bytes-long!!!");
        let token = tokens.issue(42).unwrap();

        assert_eq!(tokens.get_user_id(&token).unwrap(), 42);
        let session = tokens.verify(&token).unwrap();
        assert_eq!(session.expires_at - session.issued_at, Duration::days(7));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = provider("secret-one-secret-one-secret-one");
        let verifier = provider("secret-two-secret-two-secret-two");
        let token = issuer.issue(1).unwrap();

        assert!(matches!(
            verifier.get_user_id(&token),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = provider("test-secret-key-32-bytes-long!!!");
        let token = tokens.issue(1).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged_payload = general_purpose::URL_SAFE_NO_PAD.encode(
            serde_json::to_string(&Session {
                member_id: 999,
                issued_at: Utc::now(),
                expires_at: Utc::now() + Duration::days(7),
            })
            .unwrap(),
        );
        let forged = format!("{}.{}", forged_payload, signature);

        assert!(matches!(
            tokens.get_user_id(&forged),
            Err(AppError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = provider("test-secret-key-32-bytes-long!!!");
        let token = tokens
            .sign(&Session {
                member_id: 1,
                issued_at: Utc::now() - Duration::days(8),
                expires_at: Utc::now() - Duration::days(1),
            })
            .unwrap();

        assert!(matches!(
            tokens.get_user_id(&token),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let tokens = provider("test-secret-key-32-bytes-long!!!");

        for token in ["", "no-dot", "a.b.c", ".sig", "payload.!!!"] {
            assert!(
                matches!(tokens.get_user_id(token), Err(AppError::Unauthorized)),
                "token {token:?} should be malformed"
            );
        }
    }

    #[test]
    fn resolve_caller_uses_provider_identity() {
        let mut tokens = MockTokenProvider::new();
        tokens
            .expect_get_user_id()
            .withf(|token| token == "valid-jwt-token")
            .times(1)
            .returning(|_| Ok(1));

        let caller = resolve_caller(&tokens, "valid-jwt-token").unwrap();
        assert_eq!(caller.member_id(), 1);
    }

    #[test]
    fn resolve_caller_rejects_blank_token_without_verifying() {
        let mut tokens = MockTokenProvider::new();
        tokens.expect_get_user_id().never();

        assert!(matches!(
            resolve_caller(&tokens, "   "),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn resolve_caller_propagates_auth_failure() {
        let mut tokens = MockTokenProvider::new();
        tokens
            .expect_get_user_id()
            .returning(|_| Err(AppError::TokenExpired));

        assert!(matches!(
            resolve_caller(&tokens, "expired"),
            Err(AppError::TokenExpired)
        ));
    }
}
