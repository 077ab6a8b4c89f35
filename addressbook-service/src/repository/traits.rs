//! Repository trait definition
//!
//! Handlers depend on [`AddressRepository`] rather than on a concrete pool,
//! so the store is injected through router state. Methods use RPITIT
//! (Return Position Impl Trait In Traits) instead of `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{Page, PageRequest};
use crate::model::{Address, AddressId, NewAddress};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Store capability for address book entries
///
/// Implementations must be cheap to clone; every request receives its own
/// copy through axum state.
pub trait AddressRepository: Clone + Send + Sync + 'static {
    /// Find an entry by its identifier
    ///
    /// Returns `Ok(None)` when no entry has that identifier.
    fn find_by_id(
        &self,
        id: AddressId,
    ) -> impl Future<Output = RepositoryResult<Option<Address>>> + Send;

    /// Fetch one page of a listing
    ///
    /// The page holds at most `request.limit` entries that match the search
    /// prefix and sit strictly after `request.after` in `request.sort` order.
    fn find_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = RepositoryResult<Page>> + Send;

    /// Count all entries
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Create a new entry and return it with its assigned identifier
    fn create(&self, data: NewAddress) -> impl Future<Output = RepositoryResult<Address>> + Send;

    /// Insert many entries at once, returning how many were written
    ///
    /// Either every entry is written or none is.
    fn create_many(
        &self,
        data: Vec<NewAddress>,
    ) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Delete an entry by its identifier
    ///
    /// Returns `true` if an entry was deleted, `false` if none existed.
    fn delete(&self, id: AddressId) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Check that the store answers queries
    fn ping(&self) -> impl Future<Output = RepositoryResult<()>> + Send;
}
