use std::path::Path;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Opens (creating if missing) the embedded SQLite database and ensures the
/// schema exists. Safe to call repeatedly: the schema bootstrap is
/// `CREATE TABLE IF NOT EXISTS` per collection, so concurrent or repeated
/// opens never duplicate collections.
pub async fn create_pool(path: &Path) -> Result<SqlitePool> {
    info!("Opening database at {}", path.display());

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Schema version 1: three independent collections, each keyed by an
/// auto-incrementing integer `id` with the record body as a JSON `data`
/// column. Table names match the original persisted layout.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in ["coverLetter", "questions", "users"] {
        sqlx::query(&format!(
            r#"CREATE TABLE IF NOT EXISTS "{table}" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                data TEXT NOT NULL
            )"#
        ))
        .execute(pool)
        .await?;
    }
    Ok(())
}
