use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::movies::{Creator, Movie, MovieDetail, NewMovie, UpdateMovie},
};

use crate::DbConn;

/// Row shape of a movie joined with its creator's name.
#[derive(sqlx::FromRow)]
struct MovieWithCreatorRow {
    id: Uuid,
    title: String,
    overview: Option<String>,
    release_year: i32,
    runtime: Option<i32>,
    genres: Vec<String>,
    image_url: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    creator_name: Option<String>,
}

impl From<MovieWithCreatorRow> for MovieDetail {
    fn from(row: MovieWithCreatorRow) -> Self {
        let creator = row.creator_name.map(|name| Creator {
            id: row.created_by,
            name,
        });
        MovieDetail {
            movie: Movie {
                id: row.id,
                title: row.title,
                overview: row.overview,
                release_year: row.release_year,
                runtime: row.runtime,
                genres: row.genres,
                image_url: row.image_url,
                created_by: row.created_by,
                created_at: row.created_at,
            },
            creator,
        }
    }
}

/// Creates a new movie in the database.
pub async fn create_movie(conn: &mut DbConn, new_movie: NewMovie) -> Result<Movie> {
    let movie = sqlx::query_as::<_, Movie>(
        r#"
        INSERT INTO movies (id, title, overview, release_year, runtime, genres, image_url, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, overview, release_year, runtime, genres, image_url, created_by, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_movie.title)
    .bind(&new_movie.overview)
    .bind(new_movie.release_year)
    .bind(new_movie.runtime)
    .bind(&new_movie.genres)
    .bind(&new_movie.image_url)
    .bind(new_movie.created_by)
    .fetch_one(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(movie)
}

/// Lists all movies, newest first.
pub async fn list_movies(conn: &mut DbConn) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, title, overview, release_year, runtime, genres, image_url, created_by, created_at
        FROM movies
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(movies)
}

/// Gets a single movie by its ID. The movie may not exist.
pub async fn get_movie_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, title, overview, release_year, runtime, genres, image_url, created_by, created_at
        FROM movies
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(movie)
}

/// Gets a movie together with its creator's public fields.
pub async fn get_movie_detail(conn: &mut DbConn, id: Uuid) -> Result<Option<MovieDetail>> {
    let row = sqlx::query_as::<_, MovieWithCreatorRow>(
        r#"
        SELECT m.id, m.title, m.overview, m.release_year, m.runtime, m.genres, m.image_url,
               m.created_by, m.created_at, u.name AS creator_name
        FROM movies m
        LEFT JOIN users u ON u.id = m.created_by
        WHERE m.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(row.map(MovieDetail::from))
}

/// Gets movies by a set of IDs, in no particular order.
pub async fn get_movies_by_ids(conn: &mut DbConn, ids: &[Uuid]) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, title, overview, release_year, runtime, genres, image_url, created_by, created_at
        FROM movies
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(movies)
}

/// Applies a partial update. Returns `None` if the movie does not exist.
pub async fn update_movie(conn: &mut DbConn, id: Uuid, update: UpdateMovie) -> Result<Option<Movie>> {
    // Nullable columns use a flag so that "absent" and "clear" stay distinct:
    // - flag false: keep the current value
    // - flag true: write the bound value (which may be NULL)
    let movie = sqlx::query_as::<_, Movie>(
        r#"
        UPDATE movies
        SET title = COALESCE($2, title),
            overview = CASE WHEN $3 THEN $4 ELSE overview END,
            release_year = COALESCE($5, release_year),
            runtime = CASE WHEN $6 THEN $7 ELSE runtime END,
            genres = COALESCE($8, genres),
            image_url = COALESCE($9, image_url)
        WHERE id = $1
        RETURNING id, title, overview, release_year, runtime, genres, image_url, created_by, created_at
        "#,
    )
    .bind(id)
    .bind(&update.title)
    .bind(update.overview.is_some())
    .bind(update.overview.clone().flatten())
    .bind(update.release_year)
    .bind(update.runtime.is_some())
    .bind(update.runtime.flatten())
    .bind(&update.genres)
    .bind(&update.image_url)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(movie)
}

/// Deletes a movie by its ID. Watchlist rows cascade.
pub async fn delete_movie(conn: &mut DbConn, id: Uuid) -> Result<u64> {
    let rows_affected = sqlx::query(
        r#"
        DELETE FROM movies
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
