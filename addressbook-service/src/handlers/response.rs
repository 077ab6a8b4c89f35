//! Response bodies of the address endpoints
//!
//! Successful responses carry `"success": true` next to their payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::model::{Address, AddressId};

/// Body of `GET /address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse {
    pub success: bool,
    /// Entries in listing order
    pub addresses: Vec<Address>,
    /// URL of the next page, `null` once the listing is exhausted
    pub next: Option<String>,
}

impl ListResponse {
    pub fn new(addresses: Vec<Address>, next: Option<String>) -> Self {
        Self {
            success: true,
            addresses,
            next,
        }
    }
}

/// Body of `GET /address/{id}`: the entry's fields at the top level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressResponse {
    pub success: bool,
    #[serde(flatten)]
    pub address: Address,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            success: true,
            address,
        }
    }
}

/// Body of `POST /address`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: AddressId,
}

impl CreatedResponse {
    pub fn new(id: AddressId) -> Self {
        Self { success: true, id }
    }
}

/// Body of `DELETE /address/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}

macro_rules! ok_json_response {
    ($($ty:ty),+) => {
        $(
            impl IntoResponse for $ty {
                fn into_response(self) -> Response {
                    (StatusCode::OK, Json(self)).into_response()
                }
            }
        )+
    };
}

ok_json_response!(ListResponse, AddressResponse, CreatedResponse, SuccessResponse);
