//! Address store and listing pagination
//!
//! - [`AddressRepository`]: store capability injected into the handlers
//! - [`SqliteAddressRepository`]: the SQLite implementation
//! - [`PageRequest`], [`Cursor`], [`Page`]: the cursor pagination contract
//! - [`RepositoryError`]: store failures with operation context
//!
//! # Example
//!
//! ```rust,no_run
//! use addressbook_service::repository::{
//!     AddressRepository, PageRequest, SortField, SqliteAddressRepository,
//! };
//!
//! # async fn example(repo: SqliteAddressRepository) -> Result<(), Box<dyn std::error::Error>> {
//! let mut request = PageRequest::first_page().with_sort(SortField::LastName);
//! loop {
//!     let page = repo.find_page(&request).await?;
//!     for address in &page.items {
//!         println!("{} {}", address.first_name, address.last_name);
//!     }
//!     match page.next {
//!         Some(cursor) => request = request.after(cursor),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod pagination;
mod sqlite;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use pagination::{
    normalize_limit, prefix_pattern, Cursor, CursorError, Page, PageRequest, SortField,
    CURSOR_SEPARATOR, DEFAULT_PAGE_SIZE, LIKE_ESCAPE, MAX_PAGE_SIZE,
};
pub use sqlite::SqliteAddressRepository;
pub use traits::{AddressRepository, RepositoryResult};
