//! HTTP handlers for the address resource
//!
//! Handlers are generic over [`AddressRepository`](crate::repository::AddressRepository)
//! and receive the store through [`AppState`](crate::state::AppState).
//!
//! | Route                   | Handler             | Success body                               |
//! |-------------------------|---------------------|--------------------------------------------|
//! | `GET /address`          | [`list_addresses`]  | `{success, addresses, next}`               |
//! | `GET /address/{id}`     | [`get_address`]     | `{success, id, first_name, last_name, phone}` |
//! | `POST /address`         | [`create_address`]  | `{success, id}`                            |
//! | `DELETE /address/{id}`  | [`delete_address`]  | `{success}`                                |
//!
//! Failures are `{"error": "<message>"}`; see [`ApiError`] for status codes.

mod addresses;
mod error;
mod query;
mod response;

pub use addresses::{create_address, delete_address, get_address, list_addresses};
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::{next_page_url, ListParams, LAST_PARAM};
pub use response::{AddressResponse, CreatedResponse, ListResponse, SuccessResponse};
