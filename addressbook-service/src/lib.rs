//! # addressbook-service
//!
//! A single-resource address book REST service. People (first name, last
//! name, optional phone) live in SQLite and are exposed over HTTP with
//! list, get, create and delete operations.
//!
//! ## Features
//!
//! - **Cursor pagination**: stable listings by id or by name with an id
//!   tie-break, see [`repository::PageRequest`]
//! - **Prefix search** on first or last name
//! - **Layered configuration**: defaults, TOML files and `ADDRESSBOOK_`
//!   environment variables
//! - **Middleware stack**: request ids, tracing, timeouts, body limits,
//!   compression, CORS and panic recovery
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown** on SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use addressbook_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let repository = open_repository(&config).await?;
//!     let app = router(AppState::new(config.clone(), repository));
//!
//!     Server::new(config).serve(app).await
//! }
//! ```

pub mod bootstrap;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod model;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrap::open_repository;
    pub use crate::config::{Config, DatabaseConfig, LogFormat, SeedConfig};
    pub use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result};
    pub use crate::handlers::{ApiError, ApiErrorKind, ListParams};
    pub use crate::health::{health, readiness};
    pub use crate::model::{Address, AddressId, NewAddress};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        AddressRepository, Cursor, Page, PageRequest, RepositoryError, SortField,
        SqliteAddressRepository,
    };
    pub use crate::routes::router;
    pub use crate::server::{apply_middleware, Server};
    pub use crate::state::AppState;

    pub use axum::Router;
}
