//! Address endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    Json,
};
use tracing::{info, instrument};

use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::query::{next_page_url, ListParams};
use super::response::{AddressResponse, CreatedResponse, ListResponse, SuccessResponse};
use crate::model::{AddressId, NewAddress};
use crate::repository::AddressRepository;
use crate::state::AppState;

type HandlerResult<T> = std::result::Result<T, ApiError>;

/// Parse a path identifier; anything that is not an integer names no entry
fn parse_id(raw: &str, operation: ApiOperation) -> HandlerResult<AddressId> {
    raw.parse::<AddressId>()
        .map_err(|_| ApiError::not_found(raw).with_operation(operation))
}

/// List entries with optional search, sort and continuation
#[instrument(skip(state))]
pub async fn list_addresses<R>(
    State(state): State<AppState<R>>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<ListParams>, QueryRejection>,
) -> HandlerResult<ListResponse>
where
    R: AddressRepository,
{
    let Query(params) =
        params.map_err(|e| ApiError::bad_request(ApiOperation::List, e.body_text()))?;
    let request = params.into_page_request()?;

    let page = state.repository().find_page(&request).await?;

    let next = page
        .next
        .as_ref()
        .map(|cursor| next_page_url(uri.path(), uri.query(), &cursor.encode()))
        .transpose()
        .map_err(|e| ApiError::new(ApiOperation::List, ApiErrorKind::InternalError, e.to_string()))?;

    info!(
        sort = %request.sort,
        returned = page.items.len(),
        has_next = next.is_some(),
        "Listed addresses"
    );
    Ok(ListResponse::new(page.items, next))
}

/// Fetch one entry
#[instrument(skip(state))]
pub async fn get_address<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> HandlerResult<AddressResponse>
where
    R: AddressRepository,
{
    let address_id = parse_id(&id, ApiOperation::Get)?;

    let address = state
        .repository()
        .find_by_id(address_id)
        .await?
        .ok_or_else(|| ApiError::not_found(&id))?;

    Ok(AddressResponse::from(address))
}

/// Create an entry from `{first_name, last_name, phone?}`
#[instrument(skip(state))]
pub async fn create_address<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<NewAddress>, JsonRejection>,
) -> HandlerResult<CreatedResponse>
where
    R: AddressRepository,
{
    let Json(data) =
        payload.map_err(|e| ApiError::bad_request(ApiOperation::Create, e.body_text()))?;
    data.validate().map_err(ApiError::validation_failed)?;

    let address = state.repository().create(data).await?;

    info!(id = address.id, "Created address");
    Ok(CreatedResponse::new(address.id))
}

/// Delete an entry
#[instrument(skip(state))]
pub async fn delete_address<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> HandlerResult<SuccessResponse>
where
    R: AddressRepository,
{
    let address_id = parse_id(&id, ApiOperation::Delete)?;

    if !state.repository().delete(address_id).await? {
        return Err(ApiError::not_found(&id).with_operation(ApiOperation::Delete));
    }

    info!(id = address_id, "Deleted address");
    Ok(SuccessResponse::default())
}
