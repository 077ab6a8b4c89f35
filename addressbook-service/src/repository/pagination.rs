//! Cursor pagination for address listings
//!
//! A listing is a window over a total order of records. The order is either
//! the identifier alone, or a name column followed by the identifier as a
//! tie-break, so every record has exactly one position. A [`Cursor`] names
//! the last record of a page and the next page starts strictly after it.
//!
//! # Example
//!
//! ```rust
//! use addressbook_service::repository::{Cursor, PageRequest, SortField};
//!
//! let request = PageRequest::from_params(
//!     Some("Thomp".to_string()),
//!     Some("last_name"),
//!     Some("42__Thompson"),
//!     Some(500),
//! )
//! .unwrap();
//!
//! assert_eq!(request.sort, SortField::LastName);
//! assert_eq!(request.limit, 100);
//! assert_eq!(
//!     request.after,
//!     Some(Cursor::Name { id: 42, name: "Thompson".to_string() })
//! );
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Address, AddressId};

/// Page size used when the client does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a client can request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Separator between the identifier and the name in a name cursor
pub const CURSOR_SEPARATOR: &str = "__";

/// Escape character used in `LIKE` patterns built from user input
pub const LIKE_ESCAPE: char = '\\';

/// Ordering of a listing
///
/// Sort fields form a closed set; each maps to a fixed column name so the
/// raw request value never reaches query text.
///
/// ```rust
/// use addressbook_service::repository::SortField;
///
/// assert_eq!(SortField::parse(Some("first_name")), SortField::FirstName);
/// assert_eq!(SortField::parse(Some("phone")), SortField::Id);
/// assert_eq!(SortField::parse(None), SortField::Id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Identifier ascending
    #[default]
    Id,
    /// First name ascending, then identifier ascending
    FirstName,
    /// Last name ascending, then identifier ascending
    LastName,
}

impl SortField {
    /// Interpret a raw `sort` query value
    ///
    /// Anything other than `first_name` or `last_name` orders by identifier.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("first_name") => Self::FirstName,
            Some("last_name") => Self::LastName,
            _ => Self::Id,
        }
    }

    /// Column holding the sort key, if the order is by a name
    #[must_use]
    pub const fn name_column(&self) -> Option<&'static str> {
        match self {
            Self::Id => None,
            Self::FirstName => Some("first_name"),
            Self::LastName => Some("last_name"),
        }
    }

    /// The sort key of `address` for name orders
    #[must_use]
    pub fn name_of<'a>(&self, address: &'a Address) -> Option<&'a str> {
        match self {
            Self::Id => None,
            Self::FirstName => Some(&address.first_name),
            Self::LastName => Some(&address.last_name),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::FirstName => write!(f, "first_name"),
            Self::LastName => write!(f, "last_name"),
        }
    }
}

/// Apply the page size rules to a requested limit
///
/// ```rust
/// use addressbook_service::repository::normalize_limit;
///
/// assert_eq!(normalize_limit(None), 20);
/// assert_eq!(normalize_limit(Some(42)), 42);
/// assert_eq!(normalize_limit(Some(1000)), 100);
/// assert_eq!(normalize_limit(Some(-100)), 20);
/// ```
#[must_use]
pub fn normalize_limit(requested: Option<i64>) -> u32 {
    match requested {
        Some(limit) if limit > i64::from(MAX_PAGE_SIZE) => MAX_PAGE_SIZE,
        Some(limit) if limit > 0 => limit as u32,
        _ => DEFAULT_PAGE_SIZE,
    }
}

/// Errors from decoding a continuation token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// A name cursor without the `<id>__<name>` shape
    #[error("invalid last key: {0}")]
    MissingSeparator(String),

    /// The identifier segment is not an integer
    #[error("invalid last key {token}: {reason}")]
    InvalidId { token: String, reason: String },
}

/// Position of the last record of a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Identifier-ordered listing: encoded as `<id>`
    Id(AddressId),
    /// Name-ordered listing: encoded as `<id>__<name>`
    Name { id: AddressId, name: String },
}

impl Cursor {
    /// Cursor pointing at `address` within a listing ordered by `sort`
    #[must_use]
    pub fn after(address: &Address, sort: SortField) -> Self {
        match sort.name_of(address) {
            Some(name) => Self::Name {
                id: address.id,
                name: name.to_string(),
            },
            None => Self::Id(address.id),
        }
    }

    /// Decode a continuation token for a listing ordered by `sort`
    ///
    /// The identifier is all digits, so a name cursor is split at the first
    /// separator and the name keeps any separators it contains.
    ///
    /// ```rust
    /// use addressbook_service::repository::{Cursor, SortField};
    ///
    /// let cursor = Cursor::decode("7__Mc__Donald", SortField::LastName).unwrap();
    /// assert_eq!(cursor, Cursor::Name { id: 7, name: "Mc__Donald".to_string() });
    ///
    /// assert!(Cursor::decode("7", SortField::LastName).is_err());
    /// assert!(Cursor::decode("seven", SortField::Id).is_err());
    /// ```
    pub fn decode(token: &str, sort: SortField) -> Result<Self, CursorError> {
        if sort.name_column().is_none() {
            return parse_id(token, token).map(Self::Id);
        }

        let (id, name) = token
            .split_once(CURSOR_SEPARATOR)
            .ok_or_else(|| CursorError::MissingSeparator(token.to_string()))?;

        Ok(Self::Name {
            id: parse_id(id, token)?,
            name: name.to_string(),
        })
    }

    /// Identifier of the record the cursor points at
    #[must_use]
    pub fn id(&self) -> AddressId {
        match self {
            Self::Id(id) | Self::Name { id, .. } => *id,
        }
    }

    /// Encode the cursor as a continuation token
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name { id, name } => write!(f, "{}{}{}", id, CURSOR_SEPARATOR, name),
        }
    }
}

fn parse_id(raw: &str, token: &str) -> Result<AddressId, CursorError> {
    raw.parse::<AddressId>().map_err(|e| CursorError::InvalidId {
        token: token.to_string(),
        reason: e.to_string(),
    })
}

/// A fully validated listing request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageRequest {
    /// Prefix matched against first and last names
    pub search: Option<String>,
    /// Listing order
    pub sort: SortField,
    /// Start strictly after this position
    pub after: Option<Cursor>,
    /// Effective page size
    pub limit: u32,
}

impl PageRequest {
    /// First page of the full listing in identifier order
    #[must_use]
    pub fn first_page() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            ..Self::default()
        }
    }

    /// Build a request from raw list parameters
    ///
    /// The continuation token is decoded here so a malformed token is
    /// rejected before any query runs.
    pub fn from_params(
        search: Option<String>,
        sort: Option<&str>,
        last: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Self, CursorError> {
        let sort = SortField::parse(sort);
        let after = last.map(|token| Cursor::decode(token, sort)).transpose()?;

        Ok(Self {
            search,
            sort,
            after,
            limit: normalize_limit(limit),
        })
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: Option<i64>) -> Self {
        self.limit = normalize_limit(limit);
        self
    }

    /// Continue after `cursor`
    #[must_use]
    pub fn after(mut self, cursor: Cursor) -> Self {
        self.after = Some(cursor);
        self
    }

    /// `LIKE` pattern for the search prefix, with wildcards escaped
    #[must_use]
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(prefix_pattern)
    }
}

/// Build a `LIKE` pattern matching values that start with `prefix`
///
/// `%`, `_` and the escape character itself match literally; use the pattern
/// with `ESCAPE '\'`.
///
/// ```rust
/// use addressbook_service::repository::prefix_pattern;
///
/// assert_eq!(prefix_pattern("Thomp"), "Thomp%");
/// assert_eq!(prefix_pattern("50%_off"), "50\\%\\_off%");
/// ```
#[must_use]
pub fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Records in listing order
    pub items: Vec<Address>,
    /// Where the next page starts, `None` once the listing is exhausted
    pub next: Option<Cursor>,
}

impl Page {
    /// Wrap the records of a page fetched in `sort` order
    ///
    /// An empty page has no continuation.
    #[must_use]
    pub fn new(items: Vec<Address>, sort: SortField) -> Self {
        let next = items.last().map(|last| Cursor::after(last, sort));
        Self { items, next }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
