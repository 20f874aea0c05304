use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub overview: Option<String>,
    pub release_year: i32,
    /// Runtime in minutes
    pub runtime: Option<i32>,
    pub genres: Vec<String>,
    pub image_url: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The public fields of a movie's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: Uuid,
    pub name: String,
}

/// A movie together with its creator, as returned by the single-movie lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub creator: Option<Creator>,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub overview: Option<String>,
    pub release_year: i32,
    pub runtime: Option<i32>,
    pub genres: Vec<String>,
    pub image_url: String,
    pub created_by: Uuid,
}

/// Fields supplied by a client creating a movie. The owner and image URL
/// are filled in by the service.
#[derive(Debug, Clone, Default)]
pub struct CreateMovie {
    pub title: String,
    pub overview: Option<String>,
    pub release_year: i32,
    pub runtime: Option<i32>,
    pub genres: Vec<String>,
}

/// Partial update for a movie.
///
/// `None` leaves a field untouched. For nullable columns, `Some(None)` clears
/// the value and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub overview: Option<Option<String>>,
    pub release_year: Option<i32>,
    pub runtime: Option<Option<i32>>,
    pub genres: Option<Vec<String>>,
    pub image_url: Option<String>,
}

impl UpdateMovie {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the provided fields to `movie`, leaving the rest unchanged.
    pub fn apply_to(&self, movie: &mut Movie) {
        if let Some(title) = &self.title {
            movie.title = title.clone();
        }
        if let Some(overview) = &self.overview {
            movie.overview = overview.clone();
        }
        if let Some(release_year) = self.release_year {
            movie.release_year = release_year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = &self.genres {
            movie.genres = genres.clone();
        }
        if let Some(image_url) = &self.image_url {
            movie.image_url = image_url.clone();
        }
    }
}
