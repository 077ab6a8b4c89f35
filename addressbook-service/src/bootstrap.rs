//! Store startup: pool, schema, seed data

use crate::config::Config;
use crate::database::{create_pool, run_migrations};
use crate::error::Result;
use crate::repository::SqliteAddressRepository;
use crate::seed::seed_if_empty;

/// Open the address store described by `config`
///
/// Connects (with retries), applies migrations and seeds an empty store.
pub async fn open_repository(config: &Config) -> Result<SqliteAddressRepository> {
    let pool = create_pool(&config.database).await?;
    run_migrations(&pool).await?;

    let repository = SqliteAddressRepository::new(pool);
    let outcome = seed_if_empty(&repository, &config.seed).await?;
    tracing::debug!(?outcome, "Seed step finished");

    Ok(repository)
}
