pub mod movies;
pub mod users;
pub mod watchlist;

/// Returns true if `error` is a unique-constraint violation on `constraint`.
pub(crate) fn is_unique_violation(error: &sqlx::Error, constraint: &str) -> bool {
    match error.as_database_error() {
        Some(db_error) => {
            db_error.is_unique_violation()
                && db_error.constraint().is_none_or(|name| name == constraint)
        }
        None => false,
    }
}

/// Returns true if `error` is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_foreign_key_violation())
}
