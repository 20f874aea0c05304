use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::AuthenticatedUser,
    models::movies::{CreateMovie, Movie, MovieDetail, NewMovie, UpdateMovie},
    services::{
        images::{ImageStore, UploadedImage},
        ownership::ensure_owner,
    },
    store::Store,
    validation::validate_title,
};

pub const MOVIE_NOT_FOUND_MESSAGE: &str = "Movie not found";

/// Lists every movie, newest first
pub async fn list_movies(store: &dyn Store) -> Result<Vec<Movie>> {
    store.list_movies().await
}

/// Gets a movie with its creator
pub async fn get_movie(store: &dyn Store, id: Uuid) -> Result<MovieDetail> {
    store
        .get_movie_detail(id)
        .await?
        .ok_or_else(|| Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()))
}

/// Creates a movie owned by `user`. An image is required.
pub async fn create_movie(
    store: &dyn Store,
    images: &dyn ImageStore,
    user: &AuthenticatedUser,
    request: CreateMovie,
    image: Option<UploadedImage>,
) -> Result<Movie> {
    validate_title(&request.title)?;

    let image = image.ok_or_else(|| Error::BadRequest("Image file is required".to_string()))?;
    let image_url = images.save(image).await?;

    let movie = store
        .create_movie(NewMovie {
            title: request.title.trim().to_string(),
            overview: request.overview,
            release_year: request.release_year,
            runtime: request.runtime,
            genres: request.genres,
            image_url,
            created_by: user.id,
        })
        .await?;

    tracing::info!(movie_id = %movie.id, user_id = %user.id, "Movie created");

    Ok(movie)
}

/// Applies a partial update to a movie the user owns
///
/// A new image, when supplied, replaces the current one. Only fields present
/// in `update` change.
pub async fn update_movie(
    store: &dyn Store,
    images: &dyn ImageStore,
    user: &AuthenticatedUser,
    id: Uuid,
    mut update: UpdateMovie,
    image: Option<UploadedImage>,
) -> Result<Movie> {
    let movie = store
        .get_movie(id)
        .await?
        .ok_or_else(|| Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()))?;

    ensure_owner(user, &movie, "Not authorized to update this movie")?;

    if let Some(title) = update.title.as_mut() {
        validate_title(title)?;
        *title = title.trim().to_string();
    }

    if let Some(image) = image {
        update.image_url = Some(images.save(image).await?);
    }

    if update.is_empty() {
        return Ok(movie);
    }

    let updated = store
        .update_movie(id, update)
        .await?
        .ok_or_else(|| Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()))?;

    tracing::info!(movie_id = %id, user_id = %user.id, "Movie updated");

    Ok(updated)
}

/// Deletes a movie the user owns, together with watchlist items referencing it
pub async fn delete_movie(store: &dyn Store, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
    let movie = store
        .get_movie(id)
        .await?
        .ok_or_else(|| Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()))?;

    ensure_owner(user, &movie, "Not authorized to delete this movie")?;

    if !store.delete_movie(id).await? {
        return Err(Error::NotFound(MOVIE_NOT_FOUND_MESSAGE.to_string()));
    }

    tracing::info!(movie_id = %id, user_id = %user.id, "Movie deleted");

    Ok(())
}
