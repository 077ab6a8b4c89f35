//! Seed data loading
//!
//! An empty store is populated from a header-less CSV file whose rows are
//! `first_name,last_name,phone`. An empty phone column means no phone.

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::config::SeedConfig;
use crate::error::Result;
use crate::model::NewAddress;
use crate::repository::AddressRepository;

/// What seeding did at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Seeding is turned off in the configuration
    Disabled,
    /// The store already held this many entries
    AlreadyPopulated(u64),
    /// The CSV file does not exist
    FileMissing,
    /// This many entries were inserted
    Inserted(u64),
}

/// Parse seed rows from CSV bytes
///
/// Rows without a first or last name are skipped with a warning. A CSV
/// syntax error aborts the whole parse.
///
/// ```rust
/// use addressbook_service::seed::parse_seed_csv;
///
/// let rows = parse_seed_csv(b"Jane,Doe,\nAngela,Thompson,555-0100\n").unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].phone, None);
/// assert_eq!(rows[1].phone.as_deref(), Some("555-0100"));
/// ```
pub fn parse_seed_csv(data: &[u8]) -> Result<Vec<NewAddress>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let first_name = record.get(0).unwrap_or_default();
        let last_name = record.get(1).unwrap_or_default();
        let phone = record
            .get(2)
            .filter(|phone| !phone.is_empty())
            .map(str::to_string);

        let entry = NewAddress::new(first_name, last_name, phone);
        if let Err(reason) = entry.validate() {
            tracing::warn!(line, reason = %reason, "Skipping seed row");
            continue;
        }
        entries.push(entry);
    }

    Ok(entries)
}

/// Read and parse a seed file, `None` if it does not exist
pub async fn load_seed_file(path: &Path) -> Result<Option<Vec<NewAddress>>> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    parse_seed_csv(&data).map(Some)
}

/// Populate the store from the seed file when it holds no entries
pub async fn seed_if_empty<R>(repository: &R, config: &SeedConfig) -> Result<SeedOutcome>
where
    R: AddressRepository,
{
    if !config.enabled {
        return Ok(SeedOutcome::Disabled);
    }

    let existing = repository.count().await?;
    if existing > 0 {
        tracing::debug!(existing, "Store already populated, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated(existing));
    }

    let Some(entries) = load_seed_file(&config.csv_path).await? else {
        tracing::warn!(
            path = %config.csv_path.display(),
            "Seed file not found; store starts empty"
        );
        return Ok(SeedOutcome::FileMissing);
    };

    let inserted = repository.create_many(entries).await?;
    tracing::info!(
        inserted,
        path = %config.csv_path.display(),
        "Seeded address book"
    );

    Ok(SeedOutcome::Inserted(inserted))
}
