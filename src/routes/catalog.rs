use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Ingredient, Tag};
use crate::services::catalog;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientSearch {
    /// Name prefix
    pub name: Option<String>,
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>> {
    Ok(Json(catalog::list_tags(&state.db).await?))
}

pub async fn get_tag(State(state): State<AppState>, Path(tag_id): Path<i64>) -> Result<Json<Tag>> {
    Ok(Json(catalog::get_tag(&state.db, tag_id).await?))
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(search): Query<IngredientSearch>,
) -> Result<Json<Vec<Ingredient>>> {
    let ingredients = catalog::list_ingredients(&state.db, search.name.as_deref()).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(ingredient_id): Path<i64>,
) -> Result<Json<Ingredient>> {
    Ok(Json(catalog::get_ingredient(&state.db, ingredient_id).await?))
}
