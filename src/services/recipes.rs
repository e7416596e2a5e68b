//! Recipe mutation service and the read side of recipes.
//!
//! A recipe and its tag and ingredient associations are always written
//! inside one transaction: readers see either the previous state or the
//! complete new one, never a recipe with only part of its associations.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, Transaction};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::db::{push_id_list, tables, Db};
use crate::error::{AppError, Result};
use crate::models::{
    Page, PageRequest, Recipe, RecipeDraft, RecipeIngredient, RecipeView, Tag, UserView,
};

/// Filters accepted by the recipe listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Match recipes carrying any of these tag slugs
    pub tags: Vec<String>,
    /// Match recipes using any of these ingredient names
    pub ingredients: Vec<String>,
    pub author: Option<i64>,
    /// Only recipes the viewer favorited (ignored for anonymous viewers)
    pub is_favorited: bool,
    /// Only recipes in the viewer's cart (ignored for anonymous viewers)
    pub is_in_shopping_cart: bool,
}

#[derive(sqlx::FromRow)]
struct RecipeTagRow {
    recipe_id: i64,
    #[sqlx(flatten)]
    tag: Tag,
}

// =============================================================================
// Mutations
// =============================================================================

/// Create a recipe with its tags and ingredient amounts
///
/// The draft must carry an image reference.
pub async fn create_recipe(pool: &Db, author_id: i64, draft: &RecipeDraft) -> Result<Recipe> {
    draft.validate()?;
    let image = draft
        .image
        .as_deref()
        .ok_or_else(|| AppError::validation("image", "An image is required"))?;

    let mut tx = pool.begin().await?;

    let recipe: Recipe = sqlx::query_as(
        "INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(author_id)
    .bind(&draft.name)
    .bind(image)
    .bind(&draft.text)
    .bind(draft.cooking_time)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    replace_associations(&mut tx, recipe.id, draft).await?;
    tx.commit().await?;

    tracing::info!(
        "Recipe {} created by user {} with {} ingredients",
        recipe.id,
        author_id,
        draft.ingredients.len()
    );

    Ok(recipe)
}

/// Overwrite a recipe's fields, tag set and ingredient set
///
/// Previous associations are discarded, never merged. A draft without
/// an image keeps the stored one.
pub async fn update_recipe(pool: &Db, recipe_id: i64, draft: &RecipeDraft) -> Result<Recipe> {
    draft.validate()?;

    let mut tx = pool.begin().await?;

    let recipe: Recipe = sqlx::query_as(
        "UPDATE recipes
         SET name = ?, image = COALESCE(?, image), text = ?, cooking_time = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(&draft.name)
    .bind(draft.image.as_deref())
    .bind(&draft.text)
    .bind(draft.cooking_time)
    .bind(recipe_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Recipe"))?;

    replace_associations(&mut tx, recipe.id, draft).await?;
    tx.commit().await?;

    tracing::info!("Recipe {} updated", recipe.id);

    Ok(recipe)
}

/// Delete a recipe; its tag, ingredient, favorite and cart rows cascade
pub async fn delete_recipe(pool: &Db, recipe_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Recipe"));
    }

    tracing::info!("Recipe {} deleted", recipe_id);
    Ok(())
}

/// Replace tag and ingredient rows of `recipe_id` within `tx`
async fn replace_associations(
    tx: &mut Transaction<'_, Sqlite>,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> Result<()> {
    let tag_ids: Vec<i64> = draft.tag_ids().into_iter().collect();

    ensure_references(&mut **tx, draft).await?;

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;

    let mut insert_tags: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
    insert_tags.push_values(&tag_ids, |mut row, tag_id| {
        row.push_bind(recipe_id).push_bind(*tag_id);
    });
    insert_tags.build().execute(&mut **tx).await?;

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut **tx)
        .await?;

    let mut insert_ingredients: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
    insert_ingredients.push_values(&draft.ingredients, |mut row, item| {
        row.push_bind(recipe_id)
            .push_bind(item.id)
            .push_bind(item.amount);
    });
    insert_ingredients.build().execute(&mut **tx).await?;

    Ok(())
}

/// Check that every tag and ingredient the draft names exists
///
/// Handlers call this before storing the uploaded image; the write
/// transaction repeats the check.
pub async fn check_references(pool: &Db, draft: &RecipeDraft) -> Result<()> {
    let mut conn = pool.acquire().await?;
    ensure_references(&mut conn, draft).await
}

async fn ensure_references(conn: &mut SqliteConnection, draft: &RecipeDraft) -> Result<()> {
    let tag_ids: Vec<i64> = draft.tag_ids().into_iter().collect();
    let ingredient_ids: Vec<i64> = draft.ingredients.iter().map(|item| item.id).collect();

    ensure_exist(conn, "tags", "tags", &tag_ids).await?;
    ensure_exist(conn, "ingredients", "ingredients", &ingredient_ids).await
}

/// Reject ids missing from `table` with a validation error on `field`
async fn ensure_exist(
    conn: &mut SqliteConnection,
    table: &'static str,
    field: &'static str,
    ids: &[i64],
) -> Result<()> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut query: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT id FROM {table} WHERE id IN "));
    push_id_list(&mut query, ids);
    let found: HashSet<i64> = query
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

    match ids.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::validation(
            field,
            format!("Object with id {missing} does not exist"),
        )),
        None => Ok(()),
    }
}

// =============================================================================
// Reads
// =============================================================================

/// Load the bare recipe row
pub async fn find_recipe(pool: &Db, recipe_id: i64) -> Result<Recipe> {
    sqlx::query_as("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Recipe"))
}

/// Full representation of one recipe as seen by `viewer`
pub async fn get_recipe(pool: &Db, viewer: Option<i64>, recipe_id: i64) -> Result<RecipeView> {
    let recipe = find_recipe(pool, recipe_id).await?;
    let mut views = recipe_views(pool, viewer, vec![recipe]).await?;
    views.pop().ok_or(AppError::NotFound("Recipe"))
}

/// Page of recipes matching `filter`, ordered by name
pub async fn list_recipes(
    pool: &Db,
    viewer: Option<i64>,
    filter: &RecipeFilter,
    page: PageRequest,
) -> Result<Page<RecipeView>> {
    let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM recipes r");
    push_filters(&mut count_query, filter, viewer);
    let count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut rows_query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT r.* FROM recipes r");
    push_filters(&mut rows_query, filter, viewer);
    rows_query
        .push(" ORDER BY r.name, r.id LIMIT ")
        .push_bind(page.size)
        .push(" OFFSET ")
        .push_bind(page.offset());
    let recipes: Vec<Recipe> = rows_query.build_query_as().fetch_all(pool).await?;

    let views = recipe_views(pool, viewer, recipes).await?;
    Ok(Page::new(views, count, page))
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter, viewer: Option<i64>) {
    query.push(" WHERE 1 = 1");

    if let Some(author) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author);
    }

    if !filter.tags.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = query.separated(", ");
        for slug in &filter.tags {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    if !filter.ingredients.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_ingredients ri JOIN ingredients i ON i.id = ri.ingredient_id \
             WHERE ri.recipe_id = r.id AND i.name IN (",
        );
        let mut names = query.separated(", ");
        for name in &filter.ingredients {
            names.push_bind(name.clone());
        }
        names.push_unseparated("))");
    }

    if let Some(user_id) = viewer {
        for (enabled, table) in [
            (filter.is_favorited, tables::FAVORITES),
            (filter.is_in_shopping_cart, tables::SHOPPING_CART),
        ] {
            if enabled {
                query
                    .push(format!(
                        " AND EXISTS (SELECT 1 FROM {table} m WHERE m.recipe_id = r.id AND m.user_id = "
                    ))
                    .push_bind(user_id)
                    .push(")");
            }
        }
    }
}

/// Expand recipe rows into full representations, preserving order
///
/// Associations are loaded with one query per kind for the whole batch.
pub async fn recipe_views(
    pool: &Db,
    viewer: Option<i64>,
    recipes: Vec<Recipe>,
) -> Result<Vec<RecipeView>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i64> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<i64> = recipes
        .iter()
        .map(|r| r.author_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut tags_query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
         FROM recipe_tags rt
         JOIN tags t ON t.id = rt.tag_id
         WHERE rt.recipe_id IN ",
    );
    push_id_list(&mut tags_query, &recipe_ids);
    tags_query.push(" ORDER BY t.name, t.id");
    let tag_rows: Vec<RecipeTagRow> = tags_query.build_query_as().fetch_all(pool).await?;

    let mut ingredients_query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT ri.recipe_id, i.id, i.name, i.measurement_unit, ri.amount
         FROM recipe_ingredients ri
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE ri.recipe_id IN ",
    );
    push_id_list(&mut ingredients_query, &recipe_ids);
    ingredients_query.push(" ORDER BY ri.id");
    let ingredient_rows: Vec<RecipeIngredient> =
        ingredients_query.build_query_as().fetch_all(pool).await?;

    let mut authors_query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT u.id, u.email, u.username, u.first_name, u.last_name,
                EXISTS (SELECT 1 FROM subscriptions s WHERE s.author_id = u.id AND s.user_id = ",
    );
    authors_query
        .push_bind(viewer)
        .push(") AS is_subscribed FROM users u WHERE u.id IN ");
    push_id_list(&mut authors_query, &author_ids);
    let authors: HashMap<i64, UserView> = authors_query
        .build_query_as::<UserView>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|author| (author.id, author))
        .collect();

    let (favorited, in_cart) = match viewer {
        Some(user_id) => (
            marked_ids(pool, tables::FAVORITES, user_id, &recipe_ids).await?,
            marked_ids(pool, tables::SHOPPING_CART, user_id, &recipe_ids).await?,
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    let mut tags_by_recipe: HashMap<i64, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        tags_by_recipe.entry(row.recipe_id).or_default().push(row.tag);
    }

    let mut ingredients_by_recipe: HashMap<i64, Vec<RecipeIngredient>> = HashMap::new();
    for row in ingredient_rows {
        ingredients_by_recipe.entry(row.recipe_id).or_default().push(row);
    }

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors
                .get(&recipe.author_id)
                .cloned()
                .ok_or(AppError::NotFound("Author"))?;
            Ok(RecipeView {
                id: recipe.id,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                name: recipe.name,
                image: recipe.image,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            })
        })
        .collect()
}

/// Which of `recipe_ids` the user marked in `table`
async fn marked_ids(
    pool: &Db,
    table: &'static str,
    user_id: i64,
    recipe_ids: &[i64],
) -> Result<HashSet<i64>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT recipe_id FROM {table} WHERE user_id = "
    ));
    query.push_bind(user_id).push(" AND recipe_id IN ");
    push_id_list(&mut query, recipe_ids);

    Ok(query
        .build_query_scalar::<i64>()
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect())
}
