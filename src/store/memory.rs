use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::{
        movies::{Creator, Movie, MovieDetail, NewMovie, UpdateMovie},
        users::{NewUser, User},
        watchlist::{NewWatchlistItem, UpdateWatchlistItem, WatchlistEntry, WatchlistItem},
    },
    queries::{users::EMAIL_TAKEN_MESSAGE, watchlist::ALREADY_IN_WATCHLIST_MESSAGE},
    store::{MovieStore, UserStore, WatchlistStore},
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    movies: HashMap<Uuid, Movie>,
    watchlist: HashMap<Uuid, WatchlistItem>,
}

/// In-process store used for local development and tests.
///
/// All tables sit behind one lock, so a uniqueness check and the insert it
/// guards happen atomically, the same guarantee a database constraint gives.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users. Mostly useful in tests.
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|user| user.email == new_user.email) {
            return Err(Error::Conflict(EMAIL_TAKEN_MESSAGE.to_string()));
        }

        let user = User {
            id: Uuid::now_v7(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn create_movie(&self, new_movie: NewMovie) -> Result<Movie> {
        let mut tables = self.tables.write().await;
        let movie = Movie {
            id: Uuid::now_v7(),
            title: new_movie.title,
            overview: new_movie.overview,
            release_year: new_movie.release_year,
            runtime: new_movie.runtime,
            genres: new_movie.genres,
            image_url: new_movie.image_url,
            created_by: new_movie.created_by,
            created_at: Utc::now(),
        };
        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let tables = self.tables.read().await;
        let mut movies: Vec<Movie> = tables.movies.values().cloned().collect();
        movies.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(movies)
    }

    async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn get_movie_detail(&self, id: Uuid) -> Result<Option<MovieDetail>> {
        let tables = self.tables.read().await;
        let Some(movie) = tables.movies.get(&id).cloned() else {
            return Ok(None);
        };
        let creator = tables.users.get(&movie.created_by).map(|user| Creator {
            id: user.id,
            name: user.name.clone(),
        });
        Ok(Some(MovieDetail { movie, creator }))
    }

    async fn update_movie(&self, id: Uuid, update: UpdateMovie) -> Result<Option<Movie>> {
        let mut tables = self.tables.write().await;
        let Some(movie) = tables.movies.get_mut(&id) else {
            return Ok(None);
        };
        update.apply_to(movie);
        Ok(Some(movie.clone()))
    }

    async fn delete_movie(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.movies.remove(&id).is_none() {
            return Ok(false);
        }
        tables.watchlist.retain(|_, item| item.movie_id != id);
        Ok(true)
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn create_watchlist_item(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
        let mut tables = self.tables.write().await;
        if !tables.movies.contains_key(&new_item.movie_id) {
            return Err(Error::NotFound("Movie not found".to_string()));
        }
        let duplicate = tables
            .watchlist
            .values()
            .any(|item| item.user_id == new_item.user_id && item.movie_id == new_item.movie_id);
        if duplicate {
            return Err(Error::Conflict(ALREADY_IN_WATCHLIST_MESSAGE.to_string()));
        }

        let now = Utc::now();
        let item = WatchlistItem {
            id: Uuid::now_v7(),
            user_id: new_item.user_id,
            movie_id: new_item.movie_id,
            status: new_item.status,
            rating: new_item.rating,
            notes: new_item.notes,
            created_at: now,
            updated_at: now,
        };
        tables.watchlist.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_watchlist_item(&self, id: Uuid) -> Result<Option<WatchlistItem>> {
        Ok(self.tables.read().await.watchlist.get(&id).cloned())
    }

    async fn get_watchlist_item_for_movie(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> Result<Option<WatchlistItem>> {
        let tables = self.tables.read().await;
        Ok(tables
            .watchlist
            .values()
            .find(|item| item.user_id == user_id && item.movie_id == movie_id)
            .cloned())
    }

    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<WatchlistEntry> = tables
            .watchlist
            .values()
            .filter(|item| item.user_id == user_id)
            .filter_map(|item| {
                let movie = tables.movies.get(&item.movie_id)?.clone();
                Some(WatchlistEntry {
                    item: item.clone(),
                    movie,
                })
            })
            .collect();
        entries.sort_by(|a, b| (b.item.created_at, b.item.id).cmp(&(a.item.created_at, a.item.id)));
        Ok(entries)
    }

    async fn update_watchlist_item(
        &self,
        id: Uuid,
        update: UpdateWatchlistItem,
    ) -> Result<Option<WatchlistItem>> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.watchlist.get_mut(&id) else {
            return Ok(None);
        };
        update.apply_to(item);
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_watchlist_item(&self, id: Uuid) -> Result<bool> {
        Ok(self.tables.write().await.watchlist.remove(&id).is_some())
    }
}
