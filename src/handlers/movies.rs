//! Movie handlers
//!
//! Reads are public. Create, update and delete run behind the JWT
//! middleware and take multipart forms so a poster image can ride along.

use axum::{
    Json,
    extract::{
        Extension, Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::PathRejection,
    },
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    handlers::{success, success_message},
    middleware::auth::AuthenticatedUser,
    models::movies::{CreateMovie, UpdateMovie},
    services::{images::UploadedImage, movies},
    state::AppState,
};

/// Fields of a movie form as sent by the client
#[derive(Debug, Default)]
struct MovieForm {
    title: Option<String>,
    overview: Option<String>,
    release_year: Option<i32>,
    runtime: Option<i32>,
    genres: Option<Vec<String>>,
    image: Option<UploadedImage>,
}

impl MovieForm {
    /// Reads every field of the multipart body
    ///
    /// Genres may arrive as repeated `genres` fields, as a JSON array string,
    /// or both. Empty numeric fields count as absent. A file input left empty
    /// by the browser counts as no image.
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    if filename.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.image = Some(UploadedImage {
                        filename,
                        content_type,
                        bytes,
                    });
                }
                "title" => form.title = Some(field.text().await?),
                "overview" => form.overview = Some(field.text().await?),
                "releaseYear" => form.release_year = parse_integer("releaseYear", &field.text().await?)?,
                "runtime" => form.runtime = parse_integer("runtime", &field.text().await?)?,
                "genres" | "genres[]" => {
                    let genres = parse_genres(&field.text().await?)?;
                    form.genres.get_or_insert_with(Vec::new).extend(genres);
                }
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }
}

fn parse_integer(field: &str, value: &str) -> Result<Option<i32>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| Error::BadRequest(format!("{} must be an integer", field)))
}

fn parse_genres(value: &str) -> Result<Vec<String>> {
    let value = value.trim();
    if value.starts_with('[') {
        return serde_json::from_str(value)
            .map_err(|_| Error::BadRequest("genres must be a JSON array of strings".to_string()));
    }
    if value.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![value.to_string()])
}

/// GET /movies
///
/// Lists all movies, newest first. Public.
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let movies = movies::list_movies(state.store.as_ref()).await?;
    Ok(success(movies))
}

/// GET /movies/{id}
///
/// Returns a movie with its `creator` (`id`, `name`). Public.
///
/// # HTTP Status Codes
/// - `200 OK`: Movie found
/// - `400 BAD_REQUEST`: Malformed id
/// - `404 NOT_FOUND`: No such movie
pub async fn get_movie(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    let movie = movies::get_movie(state.store.as_ref(), id).await?;
    Ok(success(movie))
}

/// POST /movies
///
/// Creates a movie owned by the caller.
///
/// # Form Fields
/// - `title` (required), `releaseYear` (required integer)
/// - `overview`, `runtime`, `genres` (optional)
/// - `image` (required file: jpg, jpeg, png or webp)
///
/// # HTTP Status Codes
/// - `201 CREATED`: Movie created
/// - `400 BAD_REQUEST`: Missing image, title or year, or unparsable field
/// - `401 UNAUTHORIZED`: No valid token
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let form = MovieForm::read(multipart?).await?;

    let release_year = form
        .release_year
        .ok_or_else(|| Error::BadRequest("releaseYear is required".to_string()))?;

    let request = CreateMovie {
        title: form.title.unwrap_or_default(),
        overview: form.overview.filter(|overview| !overview.trim().is_empty()),
        release_year,
        runtime: form.runtime,
        genres: form.genres.unwrap_or_default(),
    };

    let movie = movies::create_movie(
        state.store.as_ref(),
        state.images.as_ref(),
        &auth_user,
        request,
        form.image,
    )
    .await?;

    Ok((StatusCode::CREATED, success(movie)))
}

/// PUT /movies/{id}
///
/// Updates the supplied fields of a movie the caller created. An empty
/// `overview` clears it. A new `image` replaces the poster.
///
/// # HTTP Status Codes
/// - `200 OK`: Movie updated
/// - `403 FORBIDDEN`: Caller is not the creator
/// - `404 NOT_FOUND`: No such movie
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    let form = MovieForm::read(multipart?).await?;

    let update = UpdateMovie {
        title: form.title,
        overview: form
            .overview
            .map(|overview| Some(overview).filter(|o| !o.trim().is_empty())),
        release_year: form.release_year,
        runtime: form.runtime.map(Some),
        genres: form.genres,
        image_url: None,
    };

    let movie = movies::update_movie(
        state.store.as_ref(),
        state.images.as_ref(),
        &auth_user,
        id,
        update,
        form.image,
    )
    .await?;

    Ok(success(movie))
}

/// DELETE /movies/{id}
///
/// Deletes a movie the caller created, along with every watchlist entry
/// pointing at it.
///
/// # HTTP Status Codes
/// - `200 OK`: Movie deleted
/// - `403 FORBIDDEN`: Caller is not the creator
/// - `404 NOT_FOUND`: No such movie
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<serde_json::Value>> {
    let Path(id) = id?;
    movies::delete_movie(state.store.as_ref(), &auth_user, id).await?;
    Ok(success_message("Movie removed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres_json_array() {
        assert_eq!(
            parse_genres(r#"["Drama", "Thriller"]"#).unwrap(),
            vec!["Drama".to_string(), "Thriller".to_string()]
        );
        assert!(parse_genres("[not json").is_err());
    }

    #[test]
    fn test_parse_genres_single_value() {
        assert_eq!(parse_genres(" Horror ").unwrap(), vec!["Horror".to_string()]);
        assert!(parse_genres("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("runtime", "142").unwrap(), Some(142));
        assert_eq!(parse_integer("runtime", "  ").unwrap(), None);
        assert!(matches!(
            parse_integer("releaseYear", "nineteen"),
            Err(Error::BadRequest(msg)) if msg == "releaseYear must be an integer"
        ));
    }
}
