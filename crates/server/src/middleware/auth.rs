//! Authentication extractor.
//!
//! Pulls the credential cookie off the request and verifies it. This is the
//! first half of the explicit auth pipeline; the ownership check is a
//! separate call each gated handler makes after extraction. A request with
//! no cookie at all is rejected before the gate is ever consulted.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_cookies::Cookies;

use crate::error::ApiError;
use crate::services::Claims;
use crate::state::AppState;

/// Cookie carrying the signed credential, set at account creation.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extractor that requires a verified credential.
///
/// Missing cookie → 401; present but unverifiable → 403.
pub struct Authenticated(pub Claims);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by CookieManagerLayer
        let cookies = parts
            .extensions
            .get::<Cookies>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthenticated("You are not authenticated!".to_string()))?;

        let Some(cookie) = cookies.get(ACCESS_TOKEN_COOKIE) else {
            return Err(ApiError::Unauthenticated(
                "You are not authenticated!".to_string(),
            ));
        };

        let claims = state
            .credentials()
            .verify(cookie.value())
            .map_err(|_| ApiError::Forbidden("Token is not valid!".to_string()))?;

        Ok(Self(claims))
    }
}
