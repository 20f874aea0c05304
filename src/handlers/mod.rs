pub mod auth;
pub mod health;
pub mod movies;
pub mod watchlist;

pub use auth::*;
pub use health::*;
pub use movies::*;
pub use watchlist::*;

use axum::Json;
use serde::Serialize;

/// Wraps a payload in the `{"status": "success", "data": ...}` envelope.
pub(crate) fn success<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "success",
        "data": data
    }))
}

/// Success envelope for operations that return no resource.
pub(crate) fn success_message(message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "success",
        "message": message
    }))
}
