//! The single ownership rule every mutating operation goes through.

use uuid::Uuid;

use crate::{
    error::{Error, Result},
    middleware::AuthenticatedUser,
    models::{movies::Movie, watchlist::WatchlistItem},
};

/// A resource that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Movie {
    fn owner_id(&self) -> Uuid {
        self.created_by
    }
}

impl Owned for WatchlistItem {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// True iff `user` owns `resource`.
pub fn owns(user: &AuthenticatedUser, resource: &impl Owned) -> bool {
    resource.owner_id() == user.id
}

/// Fails with `Forbidden(message)` unless `user` owns `resource`.
pub fn ensure_owner(user: &AuthenticatedUser, resource: &impl Owned, message: &str) -> Result<()> {
    if owns(user, resource) {
        return Ok(());
    }

    tracing::warn!(
        user_id = %user.id,
        owner_id = %resource.owner_id(),
        "Rejected mutation by non-owner"
    );
    Err(Error::Forbidden(message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::watchlist::WatchlistStatus;
    use chrono::Utc;

    fn user(id: Uuid) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
        }
    }

    fn movie(created_by: Uuid) -> Movie {
        Movie {
            id: Uuid::now_v7(),
            title: "Heat".to_string(),
            overview: None,
            release_year: 1995,
            runtime: Some(170),
            genres: vec![],
            image_url: "/uploads/heat.png".to_string(),
            created_by,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        let id = Uuid::now_v7();
        assert!(owns(&user(id), &movie(id)));
        assert!(ensure_owner(&user(id), &movie(id), "nope").is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let result = ensure_owner(&user(Uuid::now_v7()), &movie(Uuid::now_v7()), "Not yours");
        assert!(matches!(result, Err(Error::Forbidden(msg)) if msg == "Not yours"));
    }

    #[test]
    fn test_watchlist_item_owner_is_its_user() {
        let owner = Uuid::now_v7();
        let now = Utc::now();
        let item = WatchlistItem {
            id: Uuid::now_v7(),
            user_id: owner,
            movie_id: Uuid::now_v7(),
            status: WatchlistStatus::Planned,
            rating: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        assert!(owns(&user(owner), &item));
        assert!(!owns(&user(item.movie_id), &item));
    }
}
