//! Tags and ingredients: read-only over HTTP, provisioned by admin tooling.

use crate::db::{is_unique_violation, Db};
use crate::error::{AppError, Result};
use crate::models::{Ingredient, NewIngredient, NewTag, Tag};

pub async fn insert_tag(pool: &Db, new_tag: &NewTag) -> Result<Tag> {
    new_tag.validate()?;

    sqlx::query_as("INSERT INTO tags (name, color, slug) VALUES (?, ?, ?) RETURNING *")
        .bind(&new_tag.name)
        .bind(&new_tag.color)
        .bind(&new_tag.slug)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A tag with that color or slug already exists")
            } else {
                e.into()
            }
        })
}

pub async fn list_tags(pool: &Db) -> Result<Vec<Tag>> {
    let tags = sqlx::query_as("SELECT * FROM tags ORDER BY name, id")
        .fetch_all(pool)
        .await?;
    Ok(tags)
}

pub async fn get_tag(pool: &Db, tag_id: i64) -> Result<Tag> {
    sqlx::query_as("SELECT * FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Tag"))
}

pub async fn insert_ingredient(pool: &Db, new_ingredient: &NewIngredient) -> Result<Ingredient> {
    new_ingredient.validate()?;

    sqlx::query_as("INSERT INTO ingredients (name, measurement_unit) VALUES (?, ?) RETURNING *")
        .bind(&new_ingredient.name)
        .bind(&new_ingredient.measurement_unit)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("This ingredient already exists with that measurement unit")
            } else {
                e.into()
            }
        })
}

/// Ingredients ordered by name, optionally those whose name starts with
/// `name_prefix` (ASCII case-insensitive)
pub async fn list_ingredients(pool: &Db, name_prefix: Option<&str>) -> Result<Vec<Ingredient>> {
    let ingredients = match name_prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => {
            sqlx::query_as(
                "SELECT * FROM ingredients WHERE name LIKE ? ESCAPE '\\' ORDER BY name, id",
            )
            .bind(format!("{}%", escape_like(prefix)))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM ingredients ORDER BY name, id")
                .fetch_all(pool)
                .await?
        }
    };
    Ok(ingredients)
}

pub async fn get_ingredient(pool: &Db, ingredient_id: i64) -> Result<Ingredient> {
    sqlx::query_as("SELECT * FROM ingredients WHERE id = ?")
        .bind(ingredient_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Ingredient"))
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("sug"), "sug");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
