use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::{User, UserStore}};
use crate::error::{ApiError, INVALID_CREDENTIALS, USER_NOT_FOUND};

/// The caller behind a valid bearer token, resolved to a stored user.
pub struct AuthUser(pub User);

/// Pulls the credential out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl AuthUser {
    pub fn authenticate(
        headers: &HeaderMap,
        keys: &JwtKeys,
        users: &UserStore,
    ) -> Result<Self, ApiError> {
        let token = bearer_token(headers).ok_or_else(|| {
            warn!("missing or malformed bearer credential");
            ApiError::Unauthorized(INVALID_CREDENTIALS)
        })?;

        let username = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::Unauthorized(INVALID_CREDENTIALS)
        })?;

        let user = users.find_by_username(&username).ok_or_else(|| {
            warn!(%username, "token subject has no user");
            ApiError::Unauthorized(USER_NOT_FOUND)
        })?;
        Ok(AuthUser(user))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    Arc<UserStore>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let users = Arc::<UserStore>::from_ref(state);
        Self::authenticate(&parts.headers, &keys, &users)
    }
}
