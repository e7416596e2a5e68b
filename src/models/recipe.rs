use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::constants::*;
use crate::error::{AppError, Result};
use crate::models::{Tag, UserView};

/// Recipe row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    /// Reference returned by the image store
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: DateTime<Utc>,
}

/// One (ingredient, quantity) pair of a recipe payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    /// Ingredient id
    pub id: i64,
    pub amount: i64,
}

/// Validated input for creating or fully replacing a recipe
///
/// `image` is the stored reference. It is required on create; on update
/// `None` keeps the current image.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub image: Option<String>,
    pub tags: Vec<i64>,
    pub ingredients: Vec<IngredientAmount>,
}

impl RecipeDraft {
    /// Check every rule a recipe must satisfy before touching the store
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.name.chars().count() > DEFAULT_MAX_LENGTH {
            return Err(AppError::validation(
                "name",
                format!("Name must be between 1 and {DEFAULT_MAX_LENGTH} characters"),
            ));
        }

        if self.text.trim().is_empty() {
            return Err(AppError::validation("text", "Description must not be empty"));
        }

        if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&self.cooking_time) {
            return Err(AppError::validation(
                "cooking_time",
                format!(
                    "Cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes"
                ),
            ));
        }

        if self.tags.is_empty() {
            return Err(AppError::validation("tags", ERR_TAGS_REQUIRED));
        }

        if self.ingredients.is_empty() {
            return Err(AppError::validation("ingredients", ERR_INGREDIENTS_REQUIRED));
        }

        let mut seen = HashSet::with_capacity(self.ingredients.len());
        for item in &self.ingredients {
            if !seen.insert(item.id) {
                return Err(AppError::validation("ingredients", ERR_DUPLICATE_INGREDIENT));
            }
            if !(MIN_INGREDIENT_AMOUNT..=MAX_INGREDIENT_AMOUNT).contains(&item.amount) {
                return Err(AppError::validation(
                    "ingredients",
                    format!(
                        "Amount must be between {MIN_INGREDIENT_AMOUNT} and {MAX_INGREDIENT_AMOUNT}"
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Tag ids as a set; repeated ids collapse
    pub fn tag_ids(&self) -> BTreeSet<i64> {
        self.tags.iter().copied().collect()
    }
}

/// Ingredient of a recipe together with its amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RecipeIngredient {
    #[serde(skip)]
    pub recipe_id: i64,
    /// Ingredient id
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Full nested representation of a recipe
#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Short representation used by favorites, cart and subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl From<&Recipe> for RecipeShort {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}
