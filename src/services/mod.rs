//! Store-backed operations, independent of the HTTP layer.

pub mod catalog;
pub mod marks;
pub mod recipes;
pub mod shopping_list;
pub mod subscriptions;
pub mod users;

pub use marks::RecipeMark;
pub use recipes::RecipeFilter;
