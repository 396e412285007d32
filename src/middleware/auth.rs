use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::auth::{AuthError, AuthUser, JwtKeys};
use crate::error::ApiError;
use crate::state::AppState;

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

/// Handlers that take an `AuthUser` argument require a valid bearer token.
/// The identity is handed over as a value; nothing is stashed on the request.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<JwtKeys>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = Arc::<JwtKeys>::from_ref(state);
        Ok(authenticate(&parts.headers, &keys)?)
    }
}

/// Extract and verify the bearer token carried by `headers`
pub fn authenticate(headers: &HeaderMap, keys: &JwtKeys) -> Result<AuthUser, AuthError> {
    let token = extract_bearer_token(headers)?;
    keys.verify(token)
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_str = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    // Anything after the first space-separated segment is ignored
    Ok(token.split(' ').next().unwrap_or_default())
}
