//! Database module for revdash.
//!
//! This module provides SQLite connectivity (via sqlx) and migration management.

mod schema;

pub use schema::MIGRATIONS;

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::Result;

/// Connection pool type shared by all repositories.
pub type DbPool = SqlitePool;

/// Database wrapper owning the connection pool.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open a database at the specified path.
    ///
    /// The file and its parent directories are created if missing.
    /// Migrations are applied before returning.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database for testing.
    ///
    /// Uses a single connection; every connection to `:memory:` is a separate database.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        schema_version(&self.pool).await
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn schema_version(pool: &DbPool) -> Result<i64> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

/// Apply pending migrations.
///
/// Safe to call repeatedly; already-applied versions are skipped.
pub async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version     INTEGER PRIMARY KEY,
            applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .execute(pool)
    .await?;

    let current_version = schema_version(pool).await?;
    if current_version as usize >= MIGRATIONS.len() {
        debug!("Database is up to date (version {})", current_version);
        return Ok(());
    }

    info!(
        "Migrating database from version {} to {}",
        current_version,
        MIGRATIONS.len()
    );

    for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
        let version = (i + 1) as i64;
        let mut tx = pool.begin().await?;

        sqlx::raw_sql(*migration).execute(&mut *tx).await?;
        sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Migration v{} applied successfully", version);
    }

    Ok(())
}
