//! Watchlist handlers
//!
//! Every route here requires authentication and only ever touches the
//! caller's own items.

use axum::{
    Json,
    extract::{Extension, Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::Result,
    handlers::{success, success_message},
    middleware::auth::AuthenticatedUser,
    models::requests::{AddToWatchlistHttp, UpdateWatchlistItemHttp},
    services::watchlist,
    state::AppState,
};

/// GET /watchlist
///
/// Lists the caller's watchlist, newest first, each item with its movie.
pub async fn get_watchlist(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<serde_json::Value>> {
    let entries = watchlist::list_watchlist(state.store.as_ref(), &auth_user).await?;
    Ok(success(entries))
}

/// POST /watchlist
///
/// # Request Body
/// - `movieId`: Movie to track
/// - `status`: `PLANNED` (default), `WATCHING`, `COMPLETED` or `DROPPED`
/// - `rating`: Optional, 1 to 10
/// - `notes`: Optional free text
///
/// # HTTP Status Codes
/// - `201 CREATED`: Item added
/// - `400 BAD_REQUEST`: Movie already in watchlist, or invalid body
/// - `404 NOT_FOUND`: No such movie
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<AddToWatchlistHttp>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let Json(request) = payload?;
    let item = watchlist::add_to_watchlist(state.store.as_ref(), &auth_user, request).await?;
    Ok((StatusCode::CREATED, success(item)))
}

/// PUT /watchlist/{id}
///
/// Partially updates an item. `null` clears `rating` or `notes`; omitted
/// fields stay as they are.
///
/// # HTTP Status Codes
/// - `200 OK`: Item updated
/// - `403 FORBIDDEN`: Item belongs to another user
/// - `404 NOT_FOUND`: No such item
pub async fn update_watchlist_item(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateWatchlistItemHttp>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let item = watchlist::update_watchlist_item(state.store.as_ref(), &auth_user, id, request.into()).await?;
    Ok(success(item))
}

/// DELETE /watchlist/{id}
///
/// # HTTP Status Codes
/// - `200 OK`: Item removed
/// - `403 FORBIDDEN`: Item belongs to another user
/// - `404 NOT_FOUND`: No such item
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    watchlist::remove_from_watchlist(state.store.as_ref(), &auth_user, id).await?;
    Ok(success_message("Movie removed from watchlist"))
}
