use crate::{
    error::{Error, Result},
    models::users::{NewUser, User},
    queries::is_unique_violation,
};
use uuid::Uuid;

use crate::DbConn;

/// Message shared by the up-front email check and the unique constraint.
pub const EMAIL_TAKEN_MESSAGE: &str = "User already exists with this email";

/// Creates a new user in the database.
pub async fn create_user(conn: &mut DbConn, new_user: NewUser) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, password_hash, created_at
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(&new_user.name)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "users_email_key") {
            Error::Conflict(EMAIL_TAKEN_MESSAGE.to_string())
        } else {
            Error::Sqlx(e)
        }
    })?;

    Ok(user)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_user_by_id(conn: &mut DbConn, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}

/// Gets a single user by their email address. The user may not exist.
pub async fn get_user_by_email(conn: &mut DbConn, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password_hash, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(conn)
    .await
    .map_err(Error::Sqlx)?;

    Ok(user)
}
