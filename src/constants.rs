/// Cooking time bounds in minutes (inclusive)
pub const MIN_COOKING_TIME: i64 = 1;
pub const MAX_COOKING_TIME: i64 = 120;

/// Ingredient amount bounds per recipe (inclusive)
pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
pub const MAX_INGREDIENT_AMOUNT: i64 = 500;

/// Default maximum length of names, slugs and measurement units
pub const DEFAULT_MAX_LENGTH: usize = 200;

pub const MAX_TAG_NAME_LENGTH: usize = 50;

pub const MAX_EMAIL_LENGTH: usize = 254;

/// Username, first and last name limit
pub const USER_FIELD_LENGTH: usize = 150;

/// Usernames that may not be registered (compared case-insensitively)
pub const INAPPROPRIATE_USERNAMES: &[&str] =
    &["admin", "root", "superuser", "administrator", "moderator"];

/// Page size used when neither the request nor PAGE_SIZE says otherwise
pub const DEFAULT_PAGE_SIZE: i64 = 6;

/// Upper bound for the `limit` query parameter
pub const MAX_PAGE_SIZE: i64 = 100;

pub const DEFAULT_SHOPPING_LIST_FILENAME: &str = "shopping-cart.txt";

/// Subdirectory of MEDIA_ROOT holding recipe images
pub const RECIPE_IMAGE_DIR: &str = "recipes";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_TAGS_REQUIRED: &str = "At least one tag is required";

pub const ERR_INGREDIENTS_REQUIRED: &str = "At least one ingredient is required";

pub const ERR_DUPLICATE_INGREDIENT: &str = "Ingredients must be unique";

pub const ERR_SELF_SUBSCRIPTION: &str = "You cannot subscribe to yourself";

pub const ERR_ALREADY_SUBSCRIBED: &str = "You are already subscribed to this author";

pub const ERR_ALREADY_FAVORITED: &str = "Recipe is already in favorites";

pub const ERR_ALREADY_IN_CART: &str = "Recipe is already in the shopping cart";

pub const ERR_NOT_RECIPE_AUTHOR: &str = "Only the author can modify this recipe";
