use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::AuthenticatedUser,
    models::{
        requests::AddToWatchlistHttp,
        watchlist::{NewWatchlistItem, UpdateWatchlistItem, WatchlistEntry, WatchlistItem},
    },
    queries::watchlist::ALREADY_IN_WATCHLIST_MESSAGE,
    services::{movies::MOVIE_NOT_FOUND_MESSAGE, ownership::ensure_owner},
    store::Store,
    validation::validate_rating,
};

const ITEM_NOT_FOUND_MESSAGE: &str = "Watchlist item not found";

/// Lists the user's watchlist with each item's movie, newest first
pub async fn list_watchlist(store: &dyn Store, user: &AuthenticatedUser) -> Result<Vec<WatchlistEntry>> {
    store.list_watchlist(user.id).await
}

/// Adds a movie to the user's watchlist
///
/// The status defaults to `PLANNED`. Fails with `NotFound` if the movie does
/// not exist and with `Conflict` if the user already tracks it.
pub async fn add_to_watchlist(
    store: &dyn Store,
    user: &AuthenticatedUser,
    request: AddToWatchlistHttp,
) -> Result<WatchlistItem> {
    if store.get_movie(request.movie_id).await?.is_none() {
        return Err(Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()));
    }

    validate_rating(request.rating)?;

    if store
        .get_watchlist_item_for_movie(user.id, request.movie_id)
        .await?
        .is_some()
    {
        return Err(Error::Conflict(ALREADY_IN_WATCHLIST_MESSAGE.to_string()));
    }

    // A concurrent insert for the same pair is caught by the store
    let item = store
        .create_watchlist_item(NewWatchlistItem {
            user_id: user.id,
            movie_id: request.movie_id,
            status: request.status.unwrap_or_default(),
            rating: request.rating,
            notes: request.notes,
        })
        .await?;

    tracing::info!(item_id = %item.id, movie_id = %item.movie_id, user_id = %user.id, "Added to watchlist");

    Ok(item)
}

/// Applies a partial update to one of the user's watchlist items
pub async fn update_watchlist_item(
    store: &dyn Store,
    user: &AuthenticatedUser,
    id: Uuid,
    update: UpdateWatchlistItem,
) -> Result<WatchlistItem> {
    let item = store
        .get_watchlist_item(id)
        .await?
        .ok_or_else(|| Error::NotFound(ITEM_NOT_FOUND_MESSAGE.to_string()))?;

    ensure_owner(user, &item, "Not allowed to update this watchlist item")?;

    if let Some(rating) = update.rating {
        validate_rating(rating)?;
    }

    store
        .update_watchlist_item(id, update)
        .await?
        .ok_or_else(|| Error::NotFound(ITEM_NOT_FOUND_MESSAGE.to_string()))
}

/// Removes one of the user's watchlist items
pub async fn remove_from_watchlist(store: &dyn Store, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
    let item = store
        .get_watchlist_item(id)
        .await?
        .ok_or_else(|| Error::NotFound(ITEM_NOT_FOUND_MESSAGE.to_string()))?;

    ensure_owner(user, &item, "Not allowed to delete from this watchlist")?;

    if !store.delete_watchlist_item(id).await? {
        return Err(Error::NotFound(ITEM_NOT_FOUND_MESSAGE.to_string()));
    }

    tracing::info!(item_id = %id, user_id = %user.id, "Removed from watchlist");

    Ok(())
}
