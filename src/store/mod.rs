//! Credential store abstraction
//!
//! Handlers and services never reach for a global connection. They receive a
//! [`SharedStore`] through [`crate::state::AppState`], which lets the server
//! run against PostgreSQL in production and against [`MemoryStore`] in tests
//! and local development.
//!
//! Every implementation must enforce two uniqueness invariants itself, at the
//! storage layer: one user per email, and one watchlist item per
//! (user, movie) pair. Violations surface as [`crate::error::Error::Conflict`].

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{
        movies::{Movie, MovieDetail, NewMovie, UpdateMovie},
        users::{NewUser, User},
        watchlist::{NewWatchlistItem, UpdateWatchlistItem, WatchlistEntry, WatchlistItem},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn create_movie(&self, new_movie: NewMovie) -> Result<Movie>;
    /// All movies, newest first.
    async fn list_movies(&self) -> Result<Vec<Movie>>;
    async fn get_movie(&self, id: Uuid) -> Result<Option<Movie>>;
    async fn get_movie_detail(&self, id: Uuid) -> Result<Option<MovieDetail>>;
    /// Returns `None` if the movie does not exist.
    async fn update_movie(&self, id: Uuid, update: UpdateMovie) -> Result<Option<Movie>>;
    /// Returns whether a row was removed. Removes dependent watchlist items.
    async fn delete_movie(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Persists an item. Fails with `Conflict` if the user already holds one
    /// for the movie.
    async fn create_watchlist_item(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem>;
    async fn get_watchlist_item(&self, id: Uuid) -> Result<Option<WatchlistItem>>;
    async fn get_watchlist_item_for_movie(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> Result<Option<WatchlistItem>>;
    /// A user's items with their movies, newest first.
    async fn list_watchlist(&self, user_id: Uuid) -> Result<Vec<WatchlistEntry>>;
    async fn update_watchlist_item(
        &self,
        id: Uuid,
        update: UpdateWatchlistItem,
    ) -> Result<Option<WatchlistItem>>;
    async fn delete_watchlist_item(&self, id: Uuid) -> Result<bool>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store: UserStore + MovieStore + WatchlistStore {}

impl<T> Store for T where T: UserStore + MovieStore + WatchlistStore {}

/// Process-wide store handle injected into handlers.
pub type SharedStore = Arc<dyn Store>;
