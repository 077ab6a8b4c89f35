//! Repository error types
//!
//! Store failures carry the operation that was running and a coarse
//! category, so the HTTP layer can pick a status code without looking at
//! driver-specific errors.
//!
//! # Example
//!
//! ```rust
//! use addressbook_service::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::validation_failed("last_name is required");
//! assert!(matches!(error.kind, RepositoryErrorKind::ValidationFailed));
//! assert!(error.entity_id.is_none());
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Finding a single entry by identifier
    FindById,
    /// Fetching one page of a listing
    FindPage,
    /// Counting all entries
    Count,
    /// Creating a single entry
    Create,
    /// Inserting seed entries in bulk
    CreateMany,
    /// Deleting an entry
    Delete,
    /// Checking that the store answers queries
    Ping,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::FindPage => write!(f, "find_page"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::CreateMany => write!(f, "create_many"),
            Self::Delete => write!(f, "delete"),
            Self::Ping => write!(f, "ping"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Database constraint violation
    ConstraintViolation,
    /// Validation failed before the database was involved
    ValidationFailed,
    /// Could not get a connection to the database
    ConnectionFailed,
    /// Operation timed out waiting for the pool
    Timeout,
    /// Underlying database error
    DatabaseError,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The identifier of the entity involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(
            RepositoryOperation::Create,
            RepositoryErrorKind::ValidationFailed,
            message,
        )
    }

    /// Classify a driver error raised while running `operation`
    ///
    /// ```rust
    /// use addressbook_service::repository::{
    ///     RepositoryError, RepositoryErrorKind, RepositoryOperation,
    /// };
    ///
    /// let error = RepositoryError::from_sqlx(RepositoryOperation::Count, sqlx::Error::PoolTimedOut);
    /// assert_eq!(error.kind, RepositoryErrorKind::Timeout);
    /// ```
    pub fn from_sqlx(operation: RepositoryOperation, err: sqlx::Error) -> Self {
        let kind = match &err {
            sqlx::Error::PoolTimedOut => RepositoryErrorKind::Timeout,
            sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                RepositoryErrorKind::ConnectionFailed
            }
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                RepositoryErrorKind::ConstraintViolation
            }
            _ => RepositoryErrorKind::DatabaseError,
        };
        Self::new(operation, kind, err.to_string())
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}
