//! Identity Extractor
//!
//! Pulls the gateway-attested identity headers into a [`CurrentUser`]

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|v| !v.is_empty());

        let Some(user_id) = user_id else {
            tracing::warn!(uri = %parts.uri, "Request without identity headers");
            return Err(AppError::unauthorized());
        };

        let is_admin = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|role| role.eq_ignore_ascii_case("admin"))
            .unwrap_or(false);

        let user = CurrentUser {
            user_id: user_id.to_string(),
            is_admin,
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
