pub mod ingredient;
pub mod page;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod tag;
pub mod user;

pub use ingredient::{Ingredient, NewIngredient};
pub use page::{Page, PageParams, PageRequest};
pub use recipe::{
    IngredientAmount, Recipe, RecipeDraft, RecipeIngredient, RecipeShort, RecipeView,
};
pub use shopping_list::{render_shopping_list, ShoppingListItem};
pub use subscription::SubscriptionView;
pub use tag::{NewTag, Tag};
pub use user::{NewUser, User, UserView};
