use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::constants::ERR_NOT_RECIPE_AUTHOR;
use crate::error::{AppError, Result};
use crate::models::{
    render_shopping_list, IngredientAmount, Page, PageParams, PageRequest, Recipe, RecipeDraft,
    RecipeShort, RecipeView, User,
};
use crate::routes::auth::{AuthUser, MaybeUser};
use crate::services::{marks, recipes, shopping_list, RecipeFilter, RecipeMark};
use crate::AppState;

/// Body of POST and PATCH on recipes
///
/// `tags` and `ingredients` default to empty so that omitting them is
/// reported as a validation error rather than a decoding failure.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<i64>,
    /// Base64 data URI; required on create, optional on update
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
}

impl RecipeRequest {
    /// Draft without an image; the caller stores the image once the draft validates
    fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            name: self.name.clone(),
            text: self.text.clone(),
            cooking_time: self.cooking_time,
            image: None,
            tags: self.tags.clone(),
            ingredients: self.ingredients.clone(),
        }
    }
}

/// Parse `?page&limit&tags&ingredients&author&is_favorited&is_in_shopping_cart`
///
/// `tags` and `ingredients` may repeat (`tags=a&tags=b`) or be comma separated.
pub fn parse_list_query(pairs: &[(String, String)]) -> Result<(RecipeFilter, PageParams)> {
    let mut filter = RecipeFilter::default();
    let mut page = PageParams::default();

    for (key, value) in pairs {
        match key.as_str() {
            "page" => page.page = Some(parse_number(key, value)?),
            "limit" => page.limit = Some(parse_number(key, value)?),
            "author" => filter.author = Some(parse_number(key, value)?),
            "tags" => filter.tags.extend(split_list(value)),
            "ingredients" => filter.ingredients.extend(split_list(value)),
            "is_favorited" => filter.is_favorited = parse_flag(key, value)?,
            "is_in_shopping_cart" => filter.is_in_shopping_cart = parse_flag(key, value)?,
            _ => {}
        }
    }

    Ok((filter, page))
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
}

fn parse_number(key: &str, value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("{key} must be an integer")))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(AppError::InvalidInput(format!("{key} must be 0, 1, true or false"))),
    }
}

/// Load a recipe the user is allowed to modify
async fn owned_recipe(state: &AppState, user: &User, recipe_id: i64) -> Result<Recipe> {
    let recipe = recipes::find_recipe(&state.db, recipe_id).await?;
    if recipe.author_id != user.id {
        tracing::warn!(
            "User {} attempted to modify recipe {} owned by {}",
            user.id,
            recipe.id,
            recipe.author_id
        );
        return Err(AppError::Forbidden(ERR_NOT_RECIPE_AUTHOR));
    }
    Ok(recipe)
}

pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<RecipeView>>> {
    let (filter, params) = parse_list_query(&pairs)?;
    let page = PageRequest::from_params(params, state.config.page_size);
    let recipes = recipes::list_recipes(&state.db, viewer.id(), &filter, page).await?;
    Ok(Json(recipes))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeUser,
    Path(recipe_id): Path<i64>,
) -> Result<Json<RecipeView>> {
    let recipe = recipes::get_recipe(&state.db, viewer.id(), recipe_id).await?;
    Ok(Json(recipe))
}

/// Create a recipe authored by the caller
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>)> {
    let mut draft = payload.to_draft();
    draft.validate()?;
    recipes::check_references(&state.db, &draft).await?;

    let encoded = payload
        .image
        .as_deref()
        .ok_or_else(|| AppError::validation("image", "An image is required"))?;
    draft.image = Some(state.media.save_image(encoded).await?);

    let recipe = recipes::create_recipe(&state.db, user.id, &draft).await?;
    let view = recipes::get_recipe(&state.db, Some(user.id), recipe.id).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Replace a recipe's fields, tags and ingredients (author only)
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
    Json(payload): Json<RecipeRequest>,
) -> Result<Json<RecipeView>> {
    let recipe = owned_recipe(&state, &user, recipe_id).await?;

    let mut draft = payload.to_draft();
    draft.validate()?;
    recipes::check_references(&state.db, &draft).await?;
    if let Some(encoded) = payload.image.as_deref() {
        draft.image = Some(state.media.save_image(encoded).await?);
    }

    recipes::update_recipe(&state.db, recipe.id, &draft).await?;
    let view = recipes::get_recipe(&state.db, Some(user.id), recipe.id).await?;

    Ok(Json(view))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    let recipe = owned_recipe(&state, &user, recipe_id).await?;
    recipes::delete_recipe(&state.db, recipe.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeShort>)> {
    let recipe = marks::add_mark(&state.db, RecipeMark::Favorite, user.id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    marks::remove_mark(&state.db, RecipeMark::Favorite, user.id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<(StatusCode, Json<RecipeShort>)> {
    let recipe = marks::add_mark(&state.db, RecipeMark::ShoppingCart, user.id, recipe_id).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn remove_from_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<i64>,
) -> Result<StatusCode> {
    marks::remove_mark(&state.db, RecipeMark::ShoppingCart, user.id, recipe_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Export the caller's summed shopping list as a text attachment
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse> {
    let items = shopping_list::build_shopping_list(&state.db, user.id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.shopping_list_filename
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        render_shopping_list(&items),
    ))
}
