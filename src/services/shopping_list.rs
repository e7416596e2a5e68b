use crate::db::Db;
use crate::error::Result;
use crate::models::ShoppingListItem;

/// Summed ingredient list over every recipe in the user's cart
///
/// Rows are grouped by (name, measurement unit) and ordered by name as
/// stored, byte-wise. An empty cart yields an empty list.
pub async fn build_shopping_list(pool: &Db, user_id: i64) -> Result<Vec<ShoppingListItem>> {
    let items: Vec<ShoppingListItem> = sqlx::query_as(
        "SELECT i.name AS name,
                i.measurement_unit AS measurement_unit,
                SUM(ri.amount) AS total_amount
         FROM shopping_cart sc
         JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
         JOIN ingredients i ON i.id = ri.ingredient_id
         WHERE sc.user_id = ?
         GROUP BY i.name, i.measurement_unit
         ORDER BY i.name ASC, i.measurement_unit ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Shopping list for user {} has {} entries",
        user_id,
        items.len()
    );

    Ok(items)
}
