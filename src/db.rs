// src/db.rs
// SQLite pool setup and schema migrations

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use tracing::info;

/// Open a pool on `url` with foreign keys enforced and WAL journaling, then
/// bring the schema up to date.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready ({} max connections)", max_connections);

    Ok(pool)
}

/// A single-connection in-memory database with the schema applied.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    connect("sqlite::memory:", 1).await
}
