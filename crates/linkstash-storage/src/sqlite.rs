use crate::config::SqliteConfig;
use async_trait::async_trait;
use linkstash_core::repository::{ReadRepository, Repository, Result};
use linkstash_core::{Link, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info, trace};

const SCHEMA: &str = include_str!("../ddl/sqlite/links.sql");

/// SQLite implementation of the repository contract.
///
/// Links live in a single `links(short_key, uri)` table with a unique index
/// on `short_key`, so inserting a key twice fails with
/// [`StorageError::Conflict`]. Lookups take the first row in insertion order,
/// which keeps reads deterministic even on a table created before the index
/// existed.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing connection pool.
    ///
    /// The pool may be shared with other consumers. The schema is not touched;
    /// call [`SqliteRepository::ensure_schema`] if the table may be missing.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool with default settings and bootstraps the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(&SqliteConfig::new(database_url)).await
    }

    /// Opens a pool with the given settings and bootstraps the schema.
    ///
    /// In-memory URLs (`sqlite::memory:`, `mode=memory`) ignore
    /// `max_connections` and use a single long-lived connection.
    pub async fn connect_with(config: &SqliteConfig) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(config.create_if_missing)
            .busy_timeout(config.busy_timeout);
        if config.wal {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        // Every connection to an in-memory URL opens its own empty database,
        // so the pool is pinned to one connection that is never recycled.
        let in_memory = is_memory_url(&config.database_url);
        let max_connections = if in_memory { 1 } else { config.max_connections };
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if in_memory {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.ensure_schema().await?;

        info!(
            database_url = %config.database_url,
            max_connections,
            "opened sqlite store"
        );
        Ok(repository)
    }

    /// Creates the `links` table and its unique key index if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("sqlite schema ready");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("closed sqlite store");
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Configuration(_)
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(key = %key, "looking up link");

        let row = sqlx::query(
            r#"
            SELECT uri
            FROM links
            WHERE short_key = ?
            ORDER BY rowid
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let uri: String = row.try_get("uri").map_err(map_sqlx_error)?;
        Ok(Some(uri))
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM links")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total: i64 = row.try_get("total").map_err(map_sqlx_error)?;
        u64::try_from(total)
            .map_err(|e| StorageError::InvalidData(format!("invalid row count '{total}': {e}")))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, link: &Link) -> Result<()> {
        trace!(key = %link.key, "inserting link");

        // Dropping the transaction before commit queues a ROLLBACK behind the
        // INSERT on the same connection, so an abandoned call never persists.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO links (short_key, uri)
            VALUES (?, ?)
            "#,
        )
        .bind(link.key.as_str())
        .bind(link.url.as_str())
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::Conflict(link.key.clone()));
            }
            Err(err) => return Err(map_sqlx_error(err)),
        }

        tx.commit().await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_memory_urls() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://:memory:"));
        assert!(is_memory_url("sqlite://links?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://links.db?mode=rwc"));
        assert!(!is_memory_url("sqlite:///tmp/memory.db"));
    }
}
