use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::watchlist::{NewWatchlistItem, UpdateWatchlistItem, WatchlistItem},
    queries::{is_foreign_key_violation, is_unique_violation},
};

use crate::DbConn;

/// Message shared by the up-front duplicate check and the unique constraint.
pub const ALREADY_IN_WATCHLIST_MESSAGE: &str = "Movie already in watchlist";

/// Creates a watchlist item. The (user_id, movie_id) unique constraint
/// turns a concurrent duplicate into a conflict.
pub async fn create_watchlist_item(conn: &mut DbConn, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
    let item = sqlx::query_as::<_, WatchlistItem>(
        r#"
        INSERT INTO watchlist_items (id, user_id, movie_id, status, rating, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, movie_id, status, rating, notes, created_at, updated_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(new_item.user_id)
    .bind(new_item.movie_id)
    .bind(new_item.status)
    .bind(new_item.rating)
    .bind(&new_item.notes)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "watchlist_items_user_movie_key") {
            Error::Conflict(ALREADY_IN_WATCHLIST_MESSAGE.to_string())
        } else if is_foreign_key_violation(&e) {
            Error::NotFound("Movie not found".to_string())
        } else {
            Error::Sqlx(e)
        }
    })?;

    Ok(item)
}

/// Gets a single watchlist item by its ID. The item may not exist.
pub async fn get_watchlist_item_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<WatchlistItem>> {
    let item = sqlx::query_as::<_, WatchlistItem>(
        r#"
        SELECT id, user_id, movie_id, status, rating, notes, created_at, updated_at
        FROM watchlist_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(item)
}

/// Gets the item a user holds for a movie, if any.
pub async fn get_watchlist_item_for_movie(
    conn: &mut DbConn,
    user_id: Uuid,
    movie_id: Uuid,
) -> Result<Option<WatchlistItem>> {
    let item = sqlx::query_as::<_, WatchlistItem>(
        r#"
        SELECT id, user_id, movie_id, status, rating, notes, created_at, updated_at
        FROM watchlist_items
        WHERE user_id = $1 AND movie_id = $2
        "#,
    )
    .bind(user_id)
    .bind(movie_id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(item)
}

/// Lists a user's watchlist items, newest first.
pub async fn list_watchlist_items_by_user(conn: &mut DbConn, user_id: Uuid) -> Result<Vec<WatchlistItem>> {
    let items = sqlx::query_as::<_, WatchlistItem>(
        r#"
        SELECT id, user_id, movie_id, status, rating, notes, created_at, updated_at
        FROM watchlist_items
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(items)
}

/// Applies a partial update. Returns `None` if the item does not exist.
pub async fn update_watchlist_item(
    conn: &mut DbConn,
    id: Uuid,
    update: UpdateWatchlistItem,
) -> Result<Option<WatchlistItem>> {
    let item = sqlx::query_as::<_, WatchlistItem>(
        r#"
        UPDATE watchlist_items
        SET status = COALESCE($2, status),
            rating = CASE WHEN $3 THEN $4 ELSE rating END,
            notes = CASE WHEN $5 THEN $6 ELSE notes END,
            updated_at = now()
        WHERE id = $1
        RETURNING id, user_id, movie_id, status, rating, notes, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(update.status)
    .bind(update.rating.is_some())
    .bind(update.rating.flatten())
    .bind(update.notes.is_some())
    .bind(update.notes.clone().flatten())
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(item)
}

/// Deletes a watchlist item by its ID.
pub async fn delete_watchlist_item(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM watchlist_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(conn)
    .await
    .map_err(Error::Sqlx)?
    .rows_affected();

    Ok(rows_affected)
}
