use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse as _, Response},
};
use tracing::error;

pub use tower_cookies::Cookie;

use crate::state::AppState;

/// Read-only view of the request cookies.
///
/// The session cookie is written by the auth provider's frontend script,
/// so it is read in plain form rather than through a private jar.
pub struct CookieJar {
    cookies: tower_cookies::Cookies,
}

#[async_trait]
impl FromRequestParts<AppState> for CookieJar {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = match tower_cookies::Cookies::from_request_parts(parts, state).await {
            Ok(cookies) => cookies,
            Err(_) => {
                error!("Failed to extract cookies from request");
                return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
            }
        };

        Ok(CookieJar { cookies })
    }
}

impl CookieJar {
    /// Get a cookie by name
    pub fn get(&self, name: &str) -> Option<Cookie<'_>> {
        self.cookies.get(name)
    }
}
