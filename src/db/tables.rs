//! Table names shared by queries that are parameterised over a table.
//!
//! SQL cannot bind identifiers, so these are interpolated into query
//! strings. Only the constants below may ever be interpolated.

/// Recipes marked as favorite: (user_id, recipe_id)
pub const FAVORITES: &str = "favorites";

/// Recipes placed in the shopping cart: (user_id, recipe_id)
pub const SHOPPING_CART: &str = "shopping_cart";

