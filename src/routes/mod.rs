pub mod auth;
pub mod catalog;
pub mod health;
pub mod recipes;
pub mod users;

pub use auth::{AuthUser, MaybeUser};
pub use catalog::{get_ingredient, get_tag, list_ingredients, list_tags};
pub use health::health_check;
pub use recipes::{
    add_favorite, add_to_cart, create_recipe, delete_recipe, download_shopping_cart, get_recipe,
    list_recipes, remove_favorite, remove_from_cart, update_recipe,
};
pub use users::{get_user, list_subscriptions, list_users, me, subscribe, unsubscribe};
