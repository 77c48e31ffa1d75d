use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tinylink_core::repository::{Repository, Result};
use tinylink_core::{ShortCode, ShortLink, StorageError};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/sqlite/short_links.sql");

/// SQLite implementation of the repository contract.
///
/// `code` is the table's primary key, so the database enforces
/// insert-if-absent. Timestamps are stored as Unix milliseconds.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool. The schema must exist.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`, creating the file and the schema
    /// if they are missing.
    ///
    /// In-memory databases are pinned to a single connection that is never
    /// recycled, since every SQLite connection to `:memory:` opens its own
    /// private database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);

        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        let repository = Self::new(pool);
        repository.ensure_schema().await?;
        Ok(repository)
    }

    /// Creates the `short_links` table if needed.
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
}

fn parse_timestamp(column: &str, millis: i64) -> Result<Timestamp> {
    Timestamp::from_millisecond(millis).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{millis}': {e}"))
    })
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
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        sqlx::Error::Configuration(_) => StorageError::Operation(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, link: ShortLink) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (code, target_url, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(link.code().as_str())
        .bind(link.target_url())
        .bind(link.created_at().as_millisecond())
        .bind(link.expires_at().map(|ts| ts.as_millisecond()))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Duplicate(link.code().to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<ShortLink> {
        let row = sqlx::query(
            r#"
            SELECT target_url, created_at, expires_at
            FROM short_links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StorageError::NotFound(code.to_string()));
        };

        let target_url: String = row.try_get("target_url").map_err(map_sqlx_error)?;
        let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let expires_at: Option<i64> = row.try_get("expires_at").map_err(map_sqlx_error)?;

        let created_at = parse_timestamp("created_at", created_at)?;
        let expires_at = expires_at
            .map(|millis| parse_timestamp("expires_at", millis))
            .transpose()?;

        ShortLink::new(code.clone(), target_url, created_at, expires_at)
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM short_links
            WHERE code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM short_links
            WHERE expires_at IS NOT NULL
              AND expires_at <= ?
            "#,
        )
        .bind(now.as_millisecond())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
