use crate::constants::{ERR_ALREADY_SUBSCRIBED, ERR_SELF_SUBSCRIPTION};
use crate::db::{is_unique_violation, Db};
use crate::error::{AppError, Result};
use crate::models::{Page, PageRequest, RecipeShort, SubscriptionView, User};

/// Follow `author_id` and return the author's subscription representation
pub async fn subscribe(
    pool: &Db,
    subscriber_id: i64,
    author_id: i64,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionView> {
    if subscriber_id == author_id {
        return Err(AppError::validation("author", ERR_SELF_SUBSCRIPTION));
    }

    // Write first: a racing duplicate then fails on the unique constraint
    let inserted = sqlx::query(
        "INSERT INTO subscriptions (user_id, author_id) SELECT ?, id FROM users WHERE id = ?",
    )
    .bind(subscriber_id)
    .bind(author_id)
    .execute(pool)
    .await;

    match inserted {
        Ok(result) if result.rows_affected() == 0 => return Err(AppError::NotFound("User")),
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!("User {} is already subscribed to {}", subscriber_id, author_id);
            return Err(AppError::Conflict(ERR_ALREADY_SUBSCRIBED));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("User {} subscribed to {}", subscriber_id, author_id);

    let author = fetch_author(pool, author_id).await?;
    subscription_view(pool, author, recipes_limit).await
}

/// Stop following `author_id`
///
/// Fails with NotFound when the author or the subscription is absent.
pub async fn unsubscribe(pool: &Db, subscriber_id: i64, author_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = ? AND author_id = ?")
        .bind(subscriber_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        fetch_author(pool, author_id).await?;
        return Err(AppError::NotFound("Subscription"));
    }

    tracing::info!("User {} unsubscribed from {}", subscriber_id, author_id);
    Ok(())
}

/// Authors the subscriber follows, ordered by username
///
/// Each author carries at most `recipes_limit` of their newest recipes
/// (all of them when `None`) and their total recipe count.
pub async fn list_authors(
    pool: &Db,
    subscriber_id: i64,
    page: PageRequest,
    recipes_limit: Option<i64>,
) -> Result<Page<SubscriptionView>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = ?")
        .bind(subscriber_id)
        .fetch_one(pool)
        .await?;

    let authors: Vec<User> = sqlx::query_as(
        "SELECT u.*
         FROM subscriptions s
         JOIN users u ON u.id = s.author_id
         WHERE s.user_id = ?
         ORDER BY u.username
         LIMIT ? OFFSET ?",
    )
    .bind(subscriber_id)
    .bind(page.size)
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        views.push(subscription_view(pool, author, recipes_limit).await?);
    }

    Ok(Page::new(views, count, page))
}

async fn fetch_author(pool: &Db, author_id: i64) -> Result<User> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(author_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User"))
}

async fn subscription_view(
    pool: &Db,
    author: User,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionView> {
    // A negative LIMIT means no limit in SQLite
    let recipes: Vec<RecipeShort> = sqlx::query_as(
        "SELECT id, name, image, cooking_time
         FROM recipes
         WHERE author_id = ?
         ORDER BY pub_date DESC, id DESC
         LIMIT ?",
    )
    .bind(author.id)
    .bind(recipes_limit.unwrap_or(-1))
    .fetch_all(pool)
    .await?;

    let recipes_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
        .bind(author.id)
        .fetch_one(pool)
        .await?;

    Ok(SubscriptionView {
        email: author.email,
        id: author.id,
        username: author.username,
        first_name: author.first_name,
        last_name: author.last_name,
        is_subscribed: true,
        recipes,
        recipes_count,
    })
}
