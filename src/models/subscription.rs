use serde::Serialize;

use crate::models::RecipeShort;

/// An author as seen from the subscriptions list
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    /// Most recent recipes, truncated to `recipes_limit` when given
    pub recipes: Vec<RecipeShort>,
    /// Total number of recipes by this author
    pub recipes_count: i64,
}
