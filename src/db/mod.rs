pub mod tables;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

/// Database handle type (cheaply cloneable pool shared across handlers)
pub type Db = SqlitePool;

/// Open or create the SQLite database behind `database_url`
///
/// Foreign keys are enforced on every connection so join rows cascade
/// with their recipe or user.
pub async fn create_pool(database_url: &str) -> Result<Db, sqlx::Error> {
    tracing::info!("Opening database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    // Create parent directory if it doesn't exist
    let filename = options.clone().get_filename();
    if let Some(parent) = filename.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                sqlx::Error::Io(e)
            })?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .connect_with(options)
        .await?;

    tracing::info!("Database connection pool created successfully");

    Ok(pool)
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

/// Whether `err` is a UNIQUE or PRIMARY KEY constraint violation
///
/// Concurrent identical requests race past any existence check; the
/// constraint is what finally rejects the second insert.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Append `(?, ?, ...)` binding every id, for `IN` clauses
///
/// Callers must not pass an empty slice: `IN ()` is a syntax error.
pub fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}
