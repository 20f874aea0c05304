use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::watchlist::{UpdateWatchlistItem, WatchlistStatus};

/// HTTP API request for adding a movie to the caller's watchlist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToWatchlistHttp {
    pub movie_id: Uuid,
    pub status: Option<WatchlistStatus>,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

/// HTTP API request for updating a watchlist item
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateWatchlistItemHttp {
    pub status: Option<WatchlistStatus>,
    /// - `None`: Field not present, do not change.
    /// - `Some(None)`: Clear the rating.
    /// - `Some(Some(n))`: Set the rating.
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub rating: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub notes: Option<Option<String>>,
}

impl From<UpdateWatchlistItemHttp> for UpdateWatchlistItem {
    fn from(request: UpdateWatchlistItemHttp) -> Self {
        Self {
            status: request.status,
            rating: request.rating,
            notes: request.notes,
        }
    }
}

/// Helper to deserialize double options (None = missing, Some(None) = null, Some(Some) = value)
fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
