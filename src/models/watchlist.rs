use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

use crate::models::movies::Movie;

/// A user's progress on a movie.
///
/// Parsing is case-insensitive ("watching" and "WATCHING" are both accepted);
/// the canonical form is upper case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum WatchlistStatus {
    #[default]
    Planned,
    Watching,
    Completed,
    Dropped,
}

impl<'de> Deserialize<'de> for WatchlistStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "invalid status '{}', expected one of PLANNED, WATCHING, COMPLETED, DROPPED",
                raw
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub status: WatchlistStatus,
    pub rating: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A watchlist item with the movie it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub item: WatchlistItem,
    pub movie: Movie,
}

#[derive(Debug, Clone)]
pub struct NewWatchlistItem {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub status: WatchlistStatus,
    pub rating: Option<i32>,
    pub notes: Option<String>,
}

/// Partial update for a watchlist item.
///
/// - `None`: field not present, do not change.
/// - `Some(None)`: clear the value.
/// - `Some(Some(v))`: set the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateWatchlistItem {
    pub status: Option<WatchlistStatus>,
    pub rating: Option<Option<i32>>,
    pub notes: Option<Option<String>>,
}

impl UpdateWatchlistItem {
    pub fn apply_to(&self, item: &mut WatchlistItem) {
        if let Some(status) = self.status {
            item.status = status;
        }
        if let Some(rating) = self.rating {
            item.rating = rating;
        }
        if let Some(notes) = &self.notes {
            item.notes = notes.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_case_insensitively() {
        assert_eq!("watching".parse::<WatchlistStatus>().unwrap(), WatchlistStatus::Watching);
        assert_eq!("COMPLETED".parse::<WatchlistStatus>().unwrap(), WatchlistStatus::Completed);
        assert_eq!("Dropped".parse::<WatchlistStatus>().unwrap(), WatchlistStatus::Dropped);
        assert!("paused".parse::<WatchlistStatus>().is_err());
    }

    #[test]
    fn test_status_serde() {
        let status: WatchlistStatus = serde_json::from_str("\"planned\"").unwrap();
        assert_eq!(status, WatchlistStatus::Planned);
        assert_eq!(serde_json::to_string(&WatchlistStatus::Watching).unwrap(), "\"WATCHING\"");
        assert_eq!(WatchlistStatus::Completed.to_string(), "COMPLETED");
        assert!(serde_json::from_str::<WatchlistStatus>("\"unknown\"").is_err());
    }

    #[test]
    fn test_default_status_is_planned() {
        assert_eq!(WatchlistStatus::default(), WatchlistStatus::Planned);
    }

    #[test]
    fn test_apply_partial_update() {
        let now = Utc::now();
        let mut item = WatchlistItem {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            movie_id: Uuid::now_v7(),
            status: WatchlistStatus::Planned,
            rating: Some(7),
            notes: Some("rewatch".to_string()),
            created_at: now,
            updated_at: now,
        };

        UpdateWatchlistItem {
            status: Some(WatchlistStatus::Completed),
            notes: Some(None),
            ..Default::default()
        }
        .apply_to(&mut item);

        assert_eq!(item.status, WatchlistStatus::Completed);
        assert_eq!(item.rating, Some(7));
        assert_eq!(item.notes, None);
    }
}
