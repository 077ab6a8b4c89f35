//! SQLite implementation of [`AddressRepository`]

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{Cursor, Page, PageRequest};
use super::traits::{AddressRepository, RepositoryResult};
use crate::model::{Address, AddressId, NewAddress};

const SELECT_ADDRESSES: &str = "SELECT id, first_name, last_name, phone FROM addresses";

// Three bound parameters per row keeps each statement far below SQLite's
// host parameter limit.
const INSERT_BATCH_SIZE: usize = 300;

/// Address store backed by a SQLite connection pool
#[derive(Debug, Clone)]
pub struct SqliteAddressRepository {
    pool: SqlitePool,
}

impl SqliteAddressRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Build the listing query for one page
    ///
    /// User input only ever enters the statement as bound parameters; the
    /// sort column comes from the closed [`SortField`](super::SortField) set.
    fn page_query(request: &PageRequest) -> QueryBuilder<'static, Sqlite> {
        let mut builder = QueryBuilder::new(SELECT_ADDRESSES);
        builder.push(" WHERE 1 = 1");

        if let Some(pattern) = request.search_pattern() {
            builder
                .push(" AND (first_name LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR last_name LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        let column = request.sort.name_column();

        match (&request.after, column) {
            (Some(Cursor::Name { id, name }), Some(column)) => {
                builder
                    .push(" AND ((")
                    .push(column)
                    .push(" = ")
                    .push_bind(name.clone())
                    .push(" AND id > ")
                    .push_bind(*id)
                    .push(") OR ")
                    .push(column)
                    .push(" > ")
                    .push_bind(name.clone())
                    .push(")");
            }
            (Some(cursor), _) => {
                builder.push(" AND id > ").push_bind(cursor.id());
            }
            (None, _) => {}
        }

        match column {
            Some(column) => {
                builder.push(" ORDER BY ").push(column).push(" ASC, id ASC");
            }
            None => {
                builder.push(" ORDER BY id ASC");
            }
        }

        builder.push(" LIMIT ").push_bind(i64::from(request.limit));
        builder
    }
}

impl AddressRepository for SqliteAddressRepository {
    async fn find_by_id(&self, id: AddressId) -> RepositoryResult<Option<Address>> {
        sqlx::query_as::<_, Address>(
            "SELECT id, first_name, last_name, phone FROM addresses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_sqlx(RepositoryOperation::FindById, e)
                .with_entity("Address", id.to_string())
        })
    }

    async fn find_page(&self, request: &PageRequest) -> RepositoryResult<Page> {
        let mut builder = Self::page_query(request);
        let items = builder
            .build_query_as::<Address>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindPage, e))?;

        tracing::debug!(
            sort = %request.sort,
            limit = request.limit,
            returned = items.len(),
            "Fetched address page"
        );

        Ok(Page::new(items, request.sort))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Count, e))?;

        Ok(count.max(0) as u64)
    }

    async fn create(&self, data: NewAddress) -> RepositoryResult<Address> {
        data.validate().map_err(RepositoryError::validation_failed)?;

        let result =
            sqlx::query("INSERT INTO addresses (first_name, last_name, phone) VALUES (?, ?, ?)")
                .bind(&data.first_name)
                .bind(&data.last_name)
                .bind(&data.phone)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Create, e))?;

        Ok(Address {
            id: result.last_insert_rowid(),
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
        })
    }

    async fn create_many(&self, data: Vec<NewAddress>) -> RepositoryResult<u64> {
        if data.is_empty() {
            return Ok(0);
        }

        let map_err = |e| RepositoryError::from_sqlx(RepositoryOperation::CreateMany, e);
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        let mut written = 0;

        for chunk in data.chunks(INSERT_BATCH_SIZE) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("INSERT INTO addresses (first_name, last_name, phone) ");
            builder.push_values(chunk, |mut row, entry| {
                row.push_bind(entry.first_name.clone())
                    .push_bind(entry.last_name.clone())
                    .push_bind(entry.phone.clone());
            });

            let result = builder.build().execute(&mut *tx).await.map_err(map_err)?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(map_err)?;
        Ok(written)
    }

    async fn delete(&self, id: AddressId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_sqlx(RepositoryOperation::Delete, e)
                    .with_entity("Address", id.to_string())
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Ping, e))?;
        Ok(())
    }
}
