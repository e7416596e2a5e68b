use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Page, PageParams, PageRequest, SubscriptionView, UserView};
use crate::routes::auth::{AuthUser, MaybeUser};
use crate::services::{subscriptions, users};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Maximum number of recipes listed per author
    pub recipes_limit: Option<i64>,
}

impl SubscriptionParams {
    fn recipes_limit(&self) -> Result<Option<i64>> {
        match self.recipes_limit {
            Some(limit) if limit < 0 => Err(AppError::InvalidInput(
                "recipes_limit must not be negative".to_string(),
            )),
            limit => Ok(limit),
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserView>>> {
    let page = PageRequest::from_params(params, state.config.page_size);
    Ok(Json(users::list_users(&state.db, viewer.id(), page).await?))
}

pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserView>> {
    Ok(Json(users::get_user(&state.db, viewer.id(), user_id).await?))
}

/// The caller's own profile
pub async fn me(AuthUser(user): AuthUser) -> Json<UserView> {
    Json(user.view(false))
}

/// Authors the caller follows, each with a preview of their recipes
pub async fn list_subscriptions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<Page<SubscriptionView>>> {
    let recipes_limit = params.recipes_limit()?;
    let page = PageRequest::from_params(
        PageParams {
            page: params.page,
            limit: params.limit,
        },
        state.config.page_size,
    );

    let authors = subscriptions::list_authors(&state.db, user.id, page, recipes_limit).await?;
    Ok(Json(authors))
}

pub async fn subscribe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(author_id): Path<i64>,
    Query(params): Query<SubscriptionParams>,
) -> Result<(StatusCode, Json<SubscriptionView>)> {
    let recipes_limit = params.recipes_limit()?;
    let author = subscriptions::subscribe(&state.db, user.id, author_id, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(author_id): Path<i64>,
) -> Result<StatusCode> {
    subscriptions::unsubscribe(&state.db, user.id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipes_limit_must_not_be_negative() {
        let params = SubscriptionParams {
            recipes_limit: Some(-1),
            ..Default::default()
        };
        assert!(params.recipes_limit().is_err());

        let params = SubscriptionParams {
            recipes_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(params.recipes_limit().unwrap(), Some(0));
        assert_eq!(SubscriptionParams::default().recipes_limit().unwrap(), None);
    }
}
