use crate::{
    config::Config,
    services::{images::ImageStore, jwt::TokenService},
    store::SharedStore,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers
///
/// Cloned per request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Users, movies and watchlist items
    pub store: SharedStore,
    /// Issues and verifies session tokens
    pub tokens: TokenService,
    /// Where uploaded movie images go
    pub images: Arc<dyn ImageStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState instance
    ///
    /// The token service is built from `config.jwt`.
    pub fn new(store: SharedStore, images: Arc<dyn ImageStore>, config: Config) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(&config.jwt),
            images,
            config: Arc::new(config),
        }
    }
}
