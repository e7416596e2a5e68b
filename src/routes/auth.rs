use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::models::User;
use crate::security::parse_token_header;
use crate::services::users;
use crate::AppState;

/// The authenticated user; rejects anonymous requests with 401
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The authenticated user if a token was presented
///
/// A presented but unknown token is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|user| user.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeUser(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(parse_token_header)
            .ok_or(AppError::Unauthorized)?;

        match users::find_by_token(&state.db, token, &state.config.token_secret).await? {
            Some(user) => Ok(MaybeUser(Some(user))),
            None => {
                tracing::warn!("Rejected request with unknown API token");
                Err(AppError::Unauthorized)
            }
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        user.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}
