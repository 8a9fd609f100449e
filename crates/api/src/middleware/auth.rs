//! Bearer-token extractor for the signed-in user.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use skycast_core::error::CoreError;
use skycast_core::roles::is_known_role;
use skycast_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The caller behind `Authorization: Bearer <jwt>`.
///
/// Taking `AuthUser` as a handler argument makes the route require a valid
/// session; every failure answers 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// `claims.sub`.
    pub user_id: DbId,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

/// Pull the token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authentication required"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| unauthorized("Expected a Bearer token"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = match validate_token(token, &state.config.jwt) {
            Ok(claims) if is_known_role(&claims.role) => claims,
            Ok(claims) => {
                tracing::warn!(user_id = claims.sub, role = %claims.role, "Token carries unknown role");
                return Err(unauthorized("Invalid or expired token"));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                return Err(unauthorized("Invalid or expired token"));
            }
        };

        Ok(Self { user_id: claims.sub })
    }
}
