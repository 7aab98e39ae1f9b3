//! Admin authentication against the third-party auth provider.
//!
//! The provider signs short-lived session JWTs. We only verify them; no
//! users or sessions are stored here.

use std::collections::HashSet;
use std::str::FromStr;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use color_eyre::eyre::{eyre, WrapErr};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{cookies::CookieJar, errors::ApiError, state::AppState};

/// Cookie the auth provider stores its session token in
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "__session";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no session token on the request")]
    MissingToken,
    #[error("invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("user {0} is not an admin")]
    NotAdmin(String),
}

/// Claims we read from the provider's session token
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

pub struct AuthConfig {
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: Option<String>,
    admin_user_ids: Option<HashSet<String>>,
    pub session_cookie: String,
    pub sign_in_url: String,
    pub sign_out_url: String,
}

impl AuthConfig {
    pub fn from_env() -> crate::Result<Self> {
        let encoded_key = std::env::var("AUTH_PUBLIC_KEY")
            .map_err(|_| eyre!("AUTH_PUBLIC_KEY environment variable not set"))?;
        let pem = base64::engine::general_purpose::STANDARD
            .decode(encoded_key.trim())
            .wrap_err("Failed to decode base64-encoded AUTH_PUBLIC_KEY")?;

        let algorithm = std::env::var("AUTH_ALGORITHM").unwrap_or_else(|_| "RS256".to_string());
        let algorithm = Algorithm::from_str(&algorithm)
            .map_err(|e| eyre!("Unsupported AUTH_ALGORITHM {algorithm}: {e}"))?;

        let mut config = Self::from_pem(&pem, algorithm)?;
        if let Some(issuer) = std::env::var("AUTH_ISSUER").ok().filter(|s| !s.is_empty()) {
            config = config.with_issuer(issuer);
        }
        if let Ok(cookie) = std::env::var("AUTH_SESSION_COOKIE") {
            config.session_cookie = cookie;
        }
        if let Ok(url) = std::env::var("AUTH_SIGN_IN_URL") {
            config.sign_in_url = url;
        }
        if let Ok(url) = std::env::var("AUTH_SIGN_OUT_URL") {
            config.sign_out_url = url;
        }
        if let Ok(ids) = std::env::var("ADMIN_USER_IDS") {
            config = config.with_admin_user_ids(ids.split(','));
            if config.admin_user_ids.as_ref().is_some_and(HashSet::is_empty) {
                warn!("ADMIN_USER_IDS is set but lists nobody; admin access is disabled");
            }
        }

        Ok(config)
    }

    /// Config verifying tokens signed with the key in `pem`, with default cookie and URLs
    pub fn from_pem(pem: &[u8], algorithm: Algorithm) -> crate::Result<Self> {
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem),
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem),
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem),
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                return Err(eyre!("Shared-secret algorithms are not supported for session tokens"))
            }
        }
        .wrap_err("Failed to parse the auth provider public key")?;

        Ok(Self {
            decoding_key,
            algorithm,
            issuer: None,
            admin_user_ids: None,
            session_cookie: DEFAULT_SESSION_COOKIE_NAME.to_string(),
            sign_in_url: "/".to_string(),
            sign_out_url: "/".to_string(),
        })
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Restrict admin access to these user ids. Blank entries are ignored, so a
    /// blank list admits nobody.
    pub fn with_admin_user_ids<'a>(mut self, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let ids: HashSet<String> = ids
            .into_iter()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        self.admin_user_ids = Some(ids);
        self
    }

    /// Verify signature, expiry, and issuer (when configured)
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Without an allow-list every signed-in user is an admin
    pub fn is_admin(&self, user_id: &str) -> bool {
        match &self.admin_user_ids {
            Some(ids) => ids.contains(user_id),
            None => true,
        }
    }
}

/// A verified visitor
#[derive(Debug, Clone)]
pub struct SignedInUser {
    pub user_id: String,
    pub is_admin: bool,
}

/// Session token from `Authorization: Bearer`, falling back to the provider's cookie
async fn session_token(parts: &mut Parts, state: &AppState) -> Result<Option<String>, Response> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return Ok(bearer);
    }

    let cookies = CookieJar::from_request_parts(parts, state).await?;
    Ok(cookies
        .get(&state.auth.session_cookie)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty()))
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<Result<SignedInUser, AuthError>, Response> {
    let Some(token) = session_token(parts, state).await? else {
        return Ok(Err(AuthError::MissingToken));
    };

    Ok(state.auth.verify(&token).map(|claims| SignedInUser {
        is_admin: state.auth.is_admin(&claims.sub),
        user_id: claims.sub,
    }))
}

/// Admin caller of the JSON API. Rejects with a JSON 401/403.
#[derive(Debug, Clone)]
pub struct AdminUser;

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await? {
            Ok(user) if user.is_admin => Ok(AdminUser),
            Ok(user) => {
                warn!(
                    "User {} attempted to use the admin API without admin privileges",
                    user.user_id
                );
                Err(ApiError::forbidden("Admin access required.").into_response())
            }
            Err(err) => {
                info!("Rejected API request: {}", err);
                Err(ApiError::unauthorized("Authentication required.").into_response())
            }
        }
    }
}

/// Admin visitor of an HTML page. Signed-out visitors are sent to the sign-in page.
#[derive(Debug, Clone)]
pub struct AdminPage;

#[async_trait]
impl FromRequestParts<AppState> for AdminPage {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state).await? {
            Ok(user) if user.is_admin => Ok(AdminPage),
            Ok(user) => {
                warn!(
                    "User {} attempted to access admin pages without admin privileges",
                    user.user_id
                );
                Err((StatusCode::FORBIDDEN, "Admin access required").into_response())
            }
            Err(err) => {
                info!("Redirecting to sign in: {}", err);
                Err(Redirect::to(&state.auth.sign_in_url).into_response())
            }
        }
    }
}

/// The visitor, if signed in. Never rejects on a bad token.
#[derive(Debug, Clone)]
pub struct OptionalUser {
    pub user: Option<SignedInUser>,
}

impl OptionalUser {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match authenticate(parts, state).await? {
            Ok(user) => Some(user),
            Err(AuthError::MissingToken) => None,
            Err(err) => {
                info!("Ignoring session token: {}", err);
                None
            }
        };

        Ok(OptionalUser { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::auth::{mint_session_token, TEST_PUBLIC_KEY_PEM};

    fn config() -> AuthConfig {
        AuthConfig::from_pem(TEST_PUBLIC_KEY_PEM.as_bytes(), Algorithm::ES256).unwrap()
    }

    #[test]
    fn verifies_provider_token() {
        let token = mint_session_token("user_123", None, 3600);

        let claims = config().verify(&token).unwrap();
        assert_eq!(claims.sub, "user_123");
    }

    #[test]
    fn rejects_expired_token() {
        let token = mint_session_token("user_123", None, -3600);

        assert!(matches!(
            config().verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_tampered_token() {
        let token = mint_session_token("user_123", None, 3600);
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = mint_session_token("user_456", None, 3600);
        parts[1] = other.split('.').nth(1).unwrap();

        assert!(config().verify(&parts.join(".")).is_err());
    }

    #[test]
    fn enforces_issuer_when_configured() {
        let config = config().with_issuer("https://clerk.shop.example");

        let good = mint_session_token("user_123", Some("https://clerk.shop.example"), 3600);
        assert!(config.verify(&good).is_ok());

        let bad = mint_session_token("user_123", Some("https://evil.example"), 3600);
        assert!(config.verify(&bad).is_err());
    }

    #[test]
    fn admin_allow_list() {
        let open = config();
        assert!(open.is_admin("anyone"));

        let restricted = config().with_admin_user_ids("user_1, user_2 ,".split(','));
        assert!(restricted.is_admin("user_1"));
        assert!(restricted.is_admin("user_2"));
        assert!(!restricted.is_admin("user_3"));
    }

    #[test]
    fn blank_allow_list_admits_nobody() {
        let blank = config().with_admin_user_ids(" , ".split(','));
        assert!(!blank.is_admin("user_9"));

        let empty = config().with_admin_user_ids("".split(','));
        assert!(!empty.is_admin(""));
    }

    #[test]
    fn rejects_shared_secret_algorithms() {
        assert!(AuthConfig::from_pem(b"secret", Algorithm::HS256).is_err());
    }
}
