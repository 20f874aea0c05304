use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    database::DbPool,
    error::{Error, Result},
    models::{
        movies::{Movie, MovieDetail, NewMovie, UpdateMovie},
        users::{NewUser, User},
        watchlist::{NewWatchlistItem, UpdateWatchlistItem, WatchlistEntry, WatchlistItem},
    },
    queries,
    store::{MovieStore, UserStore, WatchlistStore},
};

/// PostgreSQL-backed store. Each call acquires its own pooled connection.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>> {
        self.pool.acquire().await.map_err(|e| {
            Error::Internal(format!("Failed to acquire database connection: {}", e))
        })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut conn = self.acquire().await?;
        queries::users::create_user(&mut conn, new_user).await
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let mut conn = self.acquire().await?;
        queries::users::get_user_by_id(&mut conn, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = self.acquire().await?;
        queries::users::get_user_by_email(&mut conn, email).await
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn create_movie(&self, new_movie: NewMovie) -> Result<Movie> {
        let mut conn = self.acquire().await?;
        queries::movies::create_movie(&mut conn, new_movie).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let mut conn = self.acquire().await?;
        queries::movies::list_movies(&mut conn).await
    }

    async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>> {
        let mut conn = self.acquire().await?;
        queries::movies::get_movie_by_id(&mut conn, id).await
    }

    async fn get_movie_detail(&self, id: Uuid) -> Result<Option<MovieDetail>> {
        let mut conn = self.acquire().await?;
        queries::movies::get_movie_detail(&mut conn, id).await
    }

    async fn update_movie(&self, id: Uuid, update: UpdateMovie) -> Result<Option<Movie>> {
        let mut conn = self.acquire().await?;
        queries::movies::update_movie(&mut conn, id, update).await
    }

    async fn delete_movie(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.acquire().await?;
        let rows_affected = queries::movies::delete_movie(&mut conn, id).await?;
        Ok(rows_affected > 0)
    }
}

#[async_trait]
impl WatchlistStore for PgStore {
    async fn create_watchlist_item(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
        let mut conn = self.acquire().await?;
        queries::watchlist::create_watchlist_item(&mut conn, new_item).await
    }

    async fn get_watchlist_item(&self, id: Uuid) -> Result<Option<WatchlistItem>> {
        let mut conn = self.acquire().await?;
        queries::watchlist::get_watchlist_item_by_id(&mut conn, id).await
    }

    async fn get_watchlist_item_for_movie(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> Result<Option<WatchlistItem>> {
        let mut conn = self.acquire().await?;
        queries::watchlist::get_watchlist_item_for_movie(&mut conn, user_id, movie_id).await
    }

    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>> {
        let mut conn = self.acquire().await?;
        let items = queries::watchlist::list_watchlist_items_by_user(&mut conn, user_id).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let movie_ids: Vec<Uuid> = items.iter().map(|item| item.movie_id).collect();
        let movies: HashMap<Uuid, Movie> = queries::movies::get_movies_by_ids(&mut conn, &movie_ids)
            .await?
            .into_iter()
            .map(|movie| (movie.id, movie))
            .collect();

        // The foreign key cascades, so a missing movie only means it was
        // deleted between the two reads; such items are skipped.
        let entries = items
            .into_iter()
            .filter_map(|item| {
                let movie = movies.get(&item.movie_id)?.clone();
                Some(WatchlistEntry { item, movie })
            })
            .collect();

        Ok(entries)
    }

    async fn update_watchlist_item(
        &self,
        id: Uuid,
        update: UpdateWatchlistItem,
    ) -> Result<Option<WatchlistItem>> {
        let mut conn = self.acquire().await?;
        queries::watchlist::update_watchlist_item(&mut conn, id, update).await
    }

    async fn delete_watchlist_item(&self, id: Uuid) -> Result<bool> {
        let mut conn = self.acquire().await?;
        let rows_affected = queries::watchlist::delete_watchlist_item(&mut conn, id).await?;
        Ok(rows_affected > 0)
    }
}
