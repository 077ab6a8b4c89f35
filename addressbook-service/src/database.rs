//! Database connection pool management

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DatabaseConfig;
use crate::error::{sanitize_url, DatabaseError, Result};

/// Create a SQLite connection pool with retry logic
///
/// Transient failures are retried `config.max_retries` times with exponential
/// backoff. Errors that cannot change between attempts, such as an invalid
/// URL, fail at once.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool> {
    create_pool_with_retries(config, config.max_retries).await
}

async fn create_pool_with_retries(config: &DatabaseConfig, max_retries: u32) -> Result<SqlitePool> {
    let mut attempt = 0;
    let base_delay = config.retry_delay();

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                if attempt > 0 {
                    tracing::info!(
                        "Database connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        url = %sanitize_url(&config.url),
                        max = config.max_connections,
                        min = config.min_connections,
                        "Database connection pool created"
                    );
                }
                return Ok(pool);
            }
            Err(e) => {
                if !e.is_retriable() {
                    tracing::error!("Database connection failed: {}", e);
                    return Err(e.into());
                }

                attempt += 1;

                if attempt > max_retries {
                    tracing::error!(
                        "Failed to connect to database after {} attempts: {}",
                        max_retries + 1,
                        e
                    );
                    return Err(e.into());
                }

                let delay = base_delay * 2_u32.pow(attempt.saturating_sub(1));

                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Attempt to create the pool once
async fn try_create_pool(config: &DatabaseConfig) -> std::result::Result<SqlitePool, DatabaseError> {
    let context = || sanitize_url(&config.url);

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| DatabaseError::from(e).add_context(context()))?
        .create_if_missing(true);

    let pool_options = if config.is_in_memory() {
        // One connection that never expires, or the data disappears with it
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
    };

    pool_options
        .acquire_timeout(config.connection_timeout())
        .connect_with(options)
        .await
        .map_err(|e| {
            let kind = categorize_db_error(&e);
            DatabaseError::from(e).add_context(format!("{} ({})", context(), kind))
        })
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Categorize database error for better operator guidance
fn categorize_db_error(err: &sqlx::Error) -> &'static str {
    use sqlx::Error;
    match err {
        Error::Configuration(_) => "invalid database URL or options",
        Error::Io(_) => "file I/O error, check the path and permissions",
        Error::Database(_) => "database refused the connection",
        Error::PoolTimedOut => "timed out opening connections",
        Error::PoolClosed => "connection pool closed",
        Error::WorkerCrashed => "database worker crashed",
        _ => "connection error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DatabaseErrorKind, Error};

    #[tokio::test]
    async fn test_in_memory_pool_keeps_schema() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        // Every acquire reuses the single connection holding the schema
        for _ in 0..3 {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            ..DatabaseConfig::in_memory()
        };

        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_options_fail_without_retry() {
        let config = DatabaseConfig {
            url: "sqlite://book.db?mode=sideways".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(config.max_retries > 0);

        let started = tokio::time::Instant::now();
        let error = create_pool(&config).await.unwrap_err();
        assert!(started.elapsed() < config.retry_delay());
        match error {
            Error::Database(db) => {
                assert_eq!(db.kind, DatabaseErrorKind::Configuration);
                assert!(db.context.is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_categorize_db_error() {
        assert_eq!(
            categorize_db_error(&sqlx::Error::PoolTimedOut),
            "timed out opening connections"
        );
        assert_eq!(categorize_db_error(&sqlx::Error::RowNotFound), "connection error");
    }
}
