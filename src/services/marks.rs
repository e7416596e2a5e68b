//! Favorite and shopping-cart markers on recipes.
//!
//! Both kinds share one shape: a unique (user, recipe) row created and
//! destroyed only by explicit user action.

use crate::constants::{ERR_ALREADY_FAVORITED, ERR_ALREADY_IN_CART};
use crate::db::{is_unique_violation, tables, Db};
use crate::error::{AppError, Result};
use crate::models::RecipeShort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeMark {
    Favorite,
    ShoppingCart,
}

impl RecipeMark {
    fn table(self) -> &'static str {
        match self {
            RecipeMark::Favorite => tables::FAVORITES,
            RecipeMark::ShoppingCart => tables::SHOPPING_CART,
        }
    }

    fn conflict_message(self) -> &'static str {
        match self {
            RecipeMark::Favorite => ERR_ALREADY_FAVORITED,
            RecipeMark::ShoppingCart => ERR_ALREADY_IN_CART,
        }
    }

    fn missing(self) -> AppError {
        match self {
            RecipeMark::Favorite => AppError::NotFound("Favorite"),
            RecipeMark::ShoppingCart => AppError::NotFound("Shopping cart entry"),
        }
    }
}

/// Mark a recipe for the user and return its short representation
///
/// The insert is the first statement, so a concurrent identical request
/// waits on the write lock and then hits the unique constraint.
pub async fn add_mark(
    pool: &Db,
    mark: RecipeMark,
    user_id: i64,
    recipe_id: i64,
) -> Result<RecipeShort> {
    let inserted = sqlx::query(&format!(
        "INSERT INTO {} (user_id, recipe_id) SELECT ?, id FROM recipes WHERE id = ?",
        mark.table()
    ))
    .bind(user_id)
    .bind(recipe_id)
    .execute(pool)
    .await;

    match inserted {
        Ok(result) if result.rows_affected() == 0 => return Err(AppError::NotFound("Recipe")),
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            tracing::warn!(
                "User {} already has recipe {} in {}",
                user_id,
                recipe_id,
                mark.table()
            );
            return Err(AppError::Conflict(mark.conflict_message()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!("User {} added recipe {} to {}", user_id, recipe_id, mark.table());

    sqlx::query_as("SELECT id, name, image, cooking_time FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Recipe"))
}

/// Remove the user's mark on a recipe
///
/// Fails with NotFound when the recipe or the mark does not exist.
pub async fn remove_mark(pool: &Db, mark: RecipeMark, user_id: i64, recipe_id: i64) -> Result<()> {
    let result = sqlx::query(&format!(
        "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
        mark.table()
    ))
    .bind(user_id)
    .bind(recipe_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = ?")
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;
        return Err(match exists {
            Some(_) => mark.missing(),
            None => AppError::NotFound("Recipe"),
        });
    }

    tracing::info!(
        "User {} removed recipe {} from {}",
        user_id,
        recipe_id,
        mark.table()
    );
    Ok(())
}
