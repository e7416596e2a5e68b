//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use foodgram_api::models::{
    IngredientAmount, NewIngredient, NewTag, NewUser, Recipe, RecipeDraft, Tag, User,
};
use foodgram_api::services::{catalog, recipes, users};
use foodgram_api::{create_pool, run_migrations, Config, Db};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-token-secret";

/// Smallest payload the image store accepts
pub const TEST_IMAGE: &str = "data:image/png;base64,aGVsbG8=";

/// A migrated database living in a temporary directory
pub struct TestDb {
    pub db: Db,
    pub dir: TempDir,
}

pub async fn create_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = create_pool(&url).await.expect("Failed to create test database");
    run_migrations(&db).await.expect("Failed to run migrations");
    TestDb { db, dir }
}

/// Create a test configuration
pub fn test_config(dir: &TempDir) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: String::new(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        environment: "test".to_string(),
        token_secret: TEST_SECRET.to_string(),
        media_root: dir.path().join("media").display().to_string(),
        media_url: "/media/".to_string(),
        page_size: 6,
        shopping_list_filename: "shopping-cart.txt".to_string(),
        log_requests: false,
    }
}

/// Provision a user and an API token (`token-<username>`)
pub async fn create_user(db: &Db, username: &str) -> (User, String) {
    let user = users::insert_user(
        db,
        &NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            credential_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap();

    let token = format!("token-{username}");
    users::attach_token(db, user.id, &token, TEST_SECRET)
        .await
        .unwrap();
    (user, token)
}

pub async fn create_tag(db: &Db, slug: &str, color: &str) -> Tag {
    catalog::insert_tag(
        db,
        &NewTag {
            name: slug.to_uppercase(),
            color: color.to_string(),
            slug: slug.to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn create_ingredient(db: &Db, name: &str, unit: &str) -> i64 {
    catalog::insert_ingredient(
        db,
        &NewIngredient {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

pub fn draft(name: &str, tags: &[i64], ingredients: &[(i64, i64)]) -> RecipeDraft {
    RecipeDraft {
        name: name.to_string(),
        text: "Mix everything and bake".to_string(),
        cooking_time: 30,
        image: Some("/media/recipes/test.png".to_string()),
        tags: tags.to_vec(),
        ingredients: ingredients
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

pub async fn create_recipe(
    db: &Db,
    author: &User,
    name: &str,
    tags: &[i64],
    ingredients: &[(i64, i64)],
) -> Recipe {
    recipes::create_recipe(db, author.id, &draft(name, tags, ingredients))
        .await
        .unwrap()
}

pub async fn count_rows(db: &Db, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db)
        .await
        .unwrap()
}
