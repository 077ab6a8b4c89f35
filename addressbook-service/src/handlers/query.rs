//! Query parameters of the listing endpoint
//!
//! # Example
//!
//! ```rust
//! use addressbook_service::handlers::ListParams;
//! use addressbook_service::repository::SortField;
//!
//! let params = ListParams {
//!     sort: Some("first_name".to_string()),
//!     last: Some("3__Angela".to_string()),
//!     ..ListParams::default()
//! };
//!
//! let request = params.into_page_request().unwrap();
//! assert_eq!(request.sort, SortField::FirstName);
//! assert_eq!(request.limit, 20);
//! ```

use serde::{Deserialize, Serialize};

use crate::repository::{CursorError, PageRequest};

/// Name of the continuation parameter
pub const LAST_PARAM: &str = "last";

/// Raw `GET /address` query parameters
///
/// Only `limit` is typed here; a non-integer limit is rejected by the
/// extractor before the handler runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// `first_name`, `last_name`, anything else orders by id
    pub sort: Option<String>,
    /// Name prefix to match
    pub search: Option<String>,
    /// Continuation token from a previous page
    pub last: Option<String>,
    /// Requested page size
    pub limit: Option<i64>,
}

impl ListParams {
    /// Validate and normalize into a [`PageRequest`]
    ///
    /// An empty search matches every entry and is dropped.
    pub fn into_page_request(self) -> Result<PageRequest, CursorError> {
        let search = self.search.filter(|s| !s.is_empty());
        PageRequest::from_params(
            search,
            self.sort.as_deref(),
            self.last.as_deref(),
            self.limit,
        )
    }
}

/// Rebuild a request URL with its continuation parameter set to `token`
///
/// Every other parameter keeps its value and position; `last` is replaced
/// in place or appended when absent. Keys are not re-sorted, so the link
/// follows the client's parameter order rather than a canonical one.
///
/// ```rust
/// use addressbook_service::handlers::next_page_url;
///
/// assert_eq!(
///     next_page_url("/address", Some("sort=last_name&limit=5&last=3__Doe"), "8__Smith").unwrap(),
///     "/address?sort=last_name&limit=5&last=8__Smith"
/// );
/// assert_eq!(next_page_url("/address", None, "20").unwrap(), "/address?last=20");
/// ```
pub fn next_page_url(
    path: &str,
    raw_query: Option<&str>,
    token: &str,
) -> Result<String, serde_urlencoded::ser::Error> {
    let mut pairs: Vec<(String, String)> = raw_query
        .and_then(|query| serde_urlencoded::from_str(query).ok())
        .unwrap_or_default();

    let mut replaced = false;
    pairs.retain_mut(|(key, value)| {
        if key != LAST_PARAM {
            return true;
        }
        if replaced {
            return false;
        }
        *value = token.to_string();
        replaced = true;
        true
    });
    if !replaced {
        pairs.push((LAST_PARAM.to_string(), token.to_string()));
    }

    let query = serde_urlencoded::to_string(&pairs)?;
    Ok(format!("{}?{}", path, query))
}
