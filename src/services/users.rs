use crate::{
    error::{Error, Result},
    models::users::{AuthResult, LoginUser, NewUser, RegisterUser, UserSummary},
    queries::users::EMAIL_TAKEN_MESSAGE,
    services::jwt::TokenService,
    store::Store,
    validation::{validate_email, validate_name, validate_password},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Verified against when the login email is unknown, so both failure paths
/// pay for one argon2 verification.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$4yVWLNk1W6bTPwNb29LV3AVS4yJO0lZ4UqFSv7G3R5M";

/// Registers a new user with validation and password hashing, then issues a token
pub async fn register_user(
    store: &dyn Store,
    tokens: &TokenService,
    register_user: RegisterUser,
) -> Result<AuthResult> {
    validate_name(&register_user.name)?;
    validate_email(&register_user.email)?;
    validate_password(&register_user.password)?;

    let email = normalize_email(&register_user.email);

    if store.get_user_by_email(&email).await?.is_some() {
        return Err(Error::Conflict(EMAIL_TAKEN_MESSAGE.to_string()));
    }

    let password_hash = hash_password(&register_user.password)?;

    let new_user = NewUser {
        name: register_user.name.trim().to_string(),
        email,
        password_hash,
    };

    // The store's uniqueness constraint catches a concurrent registration
    let user = store.create_user(new_user).await?;
    let issued = tokens.issue(user.id)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(AuthResult {
        user: UserSummary::from(&user),
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

/// Authenticates a user by email and password and issues a token
///
/// Unknown emails and wrong passwords fail with the same
/// [`Error::InvalidCredentials`].
pub async fn login_user(
    store: &dyn Store,
    tokens: &TokenService,
    login_user: LoginUser,
) -> Result<AuthResult> {
    let email = normalize_email(&login_user.email);

    let Some(user) = store.get_user_by_email(&email).await? else {
        let _ = verify_password(&login_user.password, DUMMY_PASSWORD_HASH);
        tracing::debug!("Login attempt for unknown email");
        return Err(Error::InvalidCredentials);
    };

    if !verify_password(&login_user.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
        return Err(Error::InvalidCredentials);
    }

    let issued = tokens.issue(user.id)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(AuthResult {
        user: UserSummary::from(&user),
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

/// Hashes a password with Argon2 and a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a password hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, UserStore};
    use chrono::Duration;

    fn tokens() -> TokenService {
        TokenService::new("unit-test-secret".to_string().into(), Duration::days(7))
    }

    fn registration(email: &str) -> RegisterUser {
        RegisterUser {
            name: "Grace Hopper".to_string(),
            email: email.to_string(),
            password: "correct-horse".to_string(),
        }
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert_ne!(hash, "s3cret-pass");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("wrong-pass", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same-password").unwrap(), hash_password("same-password").unwrap());
    }

    #[test]
    fn test_dummy_hash_parses() {
        assert!(!verify_password("anything", DUMMY_PASSWORD_HASH).unwrap());
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let store = MemoryStore::new();
        let tokens = tokens();

        let result = register_user(&store, &tokens, registration("grace@example.com")).await.unwrap();

        assert_eq!(result.user.email, "grace@example.com");
        assert_eq!(tokens.verify(&result.token).unwrap(), result.user.id);
        let stored = store.get_user_by_email("grace@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "correct-horse");
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_conflict() {
        let store = MemoryStore::new();
        let tokens = tokens();
        register_user(&store, &tokens, registration("dup@example.com")).await.unwrap();

        let result = register_user(&store, &tokens, registration("DUP@example.com")).await;

        assert!(matches!(result, Err(Error::Conflict(msg)) if msg == EMAIL_TAKEN_MESSAGE));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let store = MemoryStore::new();
        let mut request = registration("short@example.com");
        request.password = "abc".to_string();

        let result = register_user(&store, &tokens(), request).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let store = MemoryStore::new();
        let tokens = tokens();
        register_user(&store, &tokens, registration("known@example.com")).await.unwrap();

        let wrong_password = login_user(
            &store,
            &tokens,
            LoginUser {
                email: "known@example.com".to_string(),
                password: "not-the-password".to_string(),
            },
        )
        .await
        .unwrap_err();
        let unknown_email = login_user(
            &store,
            &tokens,
            LoginUser {
                email: "nobody@example.com".to_string(),
                password: "correct-horse".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_email, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_succeeds_with_correct_password() {
        let store = MemoryStore::new();
        let tokens = tokens();
        let registered = register_user(&store, &tokens, registration("login@example.com")).await.unwrap();

        let result = login_user(
            &store,
            &tokens,
            LoginUser {
                email: "login@example.com".to_string(),
                password: "correct-horse".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.user, registered.user);
        assert_eq!(tokens.verify(&result.token).unwrap(), registered.user.id);
    }
}
