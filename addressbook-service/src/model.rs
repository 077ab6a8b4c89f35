//! Address book records

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Store-assigned identifier of an address book entry
pub type AddressId = i64;

/// A person stored in the address book
///
/// Records are totally ordered by `id`, which the store assigns on insert
/// and never reuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: AddressId,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Data required to create a new entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl NewAddress {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone,
        }
    }

    /// Validate the entry before it reaches the store
    ///
    /// Both names are required and must not be empty.
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.is_empty() {
            return Err("first_name is required".to_string());
        }
        if self.last_name.is_empty() {
            return Err("last_name is required".to_string());
        }
        Ok(())
    }
}
