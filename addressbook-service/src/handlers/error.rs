//! API error types for handler operations
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a
//! status code picked from the error kind.
//!
//! # Example
//!
//! ```rust
//! use addressbook_service::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("42");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.message, "no entry with id 42");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::repository::{CursorError, RepositoryError, RepositoryErrorKind, RepositoryOperation};

/// Handler operation being performed when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// Listing entries
    List,
    /// Fetching one entry
    Get,
    /// Creating an entry
    Create,
    /// Deleting an entry
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// No entry with the requested identifier, or the store failed a read
    NotFound,
    /// Malformed query parameters or request body
    BadRequest,
    /// A required field is missing or empty
    ValidationFailed,
    /// The store failed a write
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest | Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// HTTP-facing error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: ApiOperation,
    pub kind: ApiErrorKind,
    /// Message returned to the client
    pub message: String,
    /// Identifier from the request path, when there is one
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_id: None,
        }
    }

    /// No entry has the identifier `id`
    pub fn not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            operation: ApiOperation::Get,
            kind: ApiErrorKind::NotFound,
            message: format!("no entry with id {}", id),
            entity_id: Some(id),
        }
    }

    pub fn bad_request(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::BadRequest, message)
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Create, ApiErrorKind::ValidationFailed, message)
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(ref entity_id) = self.entity_id {
            write!(f, " [Address: {}]", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        } else {
            tracing::warn!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById | RepositoryOperation::Ping => ApiOperation::Get,
        RepositoryOperation::FindPage | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Create | RepositoryOperation::CreateMany => ApiOperation::Create,
        RepositoryOperation::Delete => ApiOperation::Delete,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        // Failed writes are server errors; failed reads and deletes surface
        // as not found.
        let kind = match (err.kind, operation) {
            (RepositoryErrorKind::ValidationFailed, _) => ApiErrorKind::ValidationFailed,
            (_, ApiOperation::Create) => ApiErrorKind::InternalError,
            _ => ApiErrorKind::NotFound,
        };

        Self {
            operation,
            kind,
            message: err.message,
            entity_id: err.entity_id,
        }
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        Self::bad_request(ApiOperation::List, err.to_string())
    }
}
