//! User provisioning, token lookup and user listings.

use chrono::Utc;

use crate::db::{is_unique_violation, Db};
use crate::error::{AppError, Result};
use crate::models::{NewUser, Page, PageRequest, User, UserView};
use crate::security::hash_token;

const USER_VIEW_COLUMNS: &str = "SELECT u.id, u.email, u.username, u.first_name, u.last_name,
        EXISTS (SELECT 1 FROM subscriptions s WHERE s.author_id = u.id AND s.user_id = ?) AS is_subscribed
     FROM users u";

/// Store a new user provisioned by the authentication layer
pub async fn insert_user(pool: &Db, new_user: &NewUser) -> Result<User> {
    new_user.validate()?;

    let inserted = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, username, first_name, last_name, credential_hash, date_joined)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(&new_user.email)
    .bind(&new_user.username)
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.credential_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(user) => {
            tracing::info!("User provisioned: {}", new_user.username);
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
            "A user with that email or username already exists",
        )),
        Err(e) => Err(e.into()),
    }
}

/// Register an API token for the user; only its keyed hash is kept
pub async fn attach_token(pool: &Db, user_id: i64, token: &str, secret: &str) -> Result<()> {
    sqlx::query("INSERT INTO auth_tokens (token_hash, user_id, created_at) VALUES (?, ?, ?)")
        .bind(hash_token(token, secret))
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

/// Resolve the user owning `token`
pub async fn find_by_token(pool: &Db, token: &str, secret: &str) -> Result<Option<User>> {
    let user = sqlx::query_as(
        "SELECT u.*
         FROM auth_tokens t
         JOIN users u ON u.id = t.user_id
         WHERE t.token_hash = ?",
    )
    .bind(hash_token(token, secret))
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn get_user(pool: &Db, viewer: Option<i64>, user_id: i64) -> Result<UserView> {
    sqlx::query_as(&format!("{USER_VIEW_COLUMNS} WHERE u.id = ?"))
        .bind(viewer)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User"))
}

/// Page of users ordered by username
pub async fn list_users(pool: &Db, viewer: Option<i64>, page: PageRequest) -> Result<Page<UserView>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let users: Vec<UserView> = sqlx::query_as(&format!(
        "{USER_VIEW_COLUMNS} ORDER BY u.username LIMIT ? OFFSET ?"
    ))
    .bind(viewer)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    Ok(Page::new(users, count, page))
}
