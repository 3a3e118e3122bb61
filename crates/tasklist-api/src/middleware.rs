use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::AuthService;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity of the caller, placed in request extensions by `require_auth`
/// and read back by handlers as an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Extract and validate the bearer token from the Authorization header.
///
/// Rejections carry a fixed message for each malformed-header case; a token
/// that fails verification is rejected with the token error's own text.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = identify(&state.auth, req.headers())?;

    req.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(req).await)
}

fn identify(auth: &AuthService, headers: &HeaderMap) -> Result<i64, ApiError> {
    let value = match headers.get(header::AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(ApiError::unauthorized("empty auth header")),
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("invalid auth header"))?;

    let parts: Vec<&str> = value.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(ApiError::unauthorized("invalid auth header"));
    };
    if *scheme != "Bearer" {
        return Err(ApiError::unauthorized("invalid auth header"));
    }

    if token.is_empty() {
        return Err(ApiError::unauthorized("token is empty"));
    }

    auth.parse_token(token).map_err(|e| {
        warn!("rejected bearer token: {}", e);
        ApiError::unauthorized(e.to_string())
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("unauthorized user"))
    }
}
