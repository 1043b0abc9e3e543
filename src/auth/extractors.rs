use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::services::JwtKeys;
use crate::error::AppError;

/// Identity of the bearer of a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

/// Pulls `<token>` out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // No token at all is 401; a token that fails verification is 403.
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthenticated("Missing authentication token".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Forbidden("Invalid or expired token".into())
        })?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
