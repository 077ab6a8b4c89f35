//! Route table

use axum::{routing::get, Router};

use crate::handlers::{create_address, delete_address, get_address, list_addresses};
use crate::health::{health, readiness};
use crate::repository::AddressRepository;
use crate::state::AppState;

/// Build the service router without middleware
///
/// [`Server::serve`](crate::server::Server::serve) adds the middleware
/// stack; tests can drive this router directly.
pub fn router<R>(state: AppState<R>) -> Router
where
    R: AddressRepository,
{
    Router::new()
        .route("/health", get(health::<R>))
        .route("/ready", get(readiness::<R>))
        .route(
            "/address",
            get(list_addresses::<R>).post(create_address::<R>),
        )
        .route(
            "/address/{id}",
            get(get_address::<R>).delete(delete_address::<R>),
        )
        .with_state(state)
}
