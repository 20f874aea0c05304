//! HTTP routing
//!
//! Public routes serve reads and the auth endpoints. Mutations sit behind
//! [`jwt_auth_middleware`] via `route_layer`, so unknown paths still 404
//! instead of 401.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer,
};

use crate::{
    handlers::{
        add_to_watchlist, create_movie, delete_movie, get_movie, get_watchlist, health_check,
        list_movies, login, logout, register, remove_from_watchlist, update_movie,
        update_watchlist_item,
    },
    middleware::jwt_auth_middleware,
    state::AppState,
};

/// Builds the application router with all routes and layers
pub fn build_router(state: AppState) -> Router {
    let uploads = state.config.uploads.clone();

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/movies", get(list_movies))
        .route("/movies/{id}", get(get_movie));

    let protected_routes = Router::new()
        .route("/movies", post(create_movie))
        .route("/movies/{id}", put(update_movie).delete(delete_movie))
        .route("/watchlist", get(get_watchlist).post(add_to_watchlist))
        .route(
            "/watchlist/{id}",
            put(update_watchlist_item).delete(remove_from_watchlist),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service(&uploads.public_url, ServeDir::new(&uploads.dir))
        // Multipart uploads are bounded by the configured limit instead of axum's default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(uploads.max_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
