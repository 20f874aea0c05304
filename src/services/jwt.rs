use crate::config::JwtConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's id as a string
    pub id: String,
    /// Expiration time as Unix timestamp
    pub exp: i64,
    /// Issued at time as Unix timestamp
    pub iat: i64,
}

/// A freshly signed token and the moment it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generates a JWT for a user
///
/// # Arguments
/// * `user_id` - The user's UUID
/// * `secret` - The JWT secret key for signing
/// * `lifetime` - How long the token stays valid
///
/// # Example
/// ```rust,no_run
/// use movietrack::services::jwt::generate_jwt;
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let token = generate_jwt(user_id, "my-secret", chrono::Duration::days(7))?;
/// # Ok::<(), movietrack::error::Error>(())
/// ```
pub fn generate_jwt(user_id: Uuid, secret: &str, lifetime: Duration) -> Result<IssuedToken> {
    let now = Utc::now();
    let expires_at = now + lifetime;

    let claims = Claims {
        id: user_id.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verifies a JWT token and returns the claims if valid
///
/// Expiry is checked without leeway: a token is valid up to its `exp`
/// second and invalid after.
///
/// # Errors
/// Returns `InvalidToken` if the token is malformed, expired, or has a bad signature
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::InvalidToken("Token has expired".to_string()),
        ErrorKind::InvalidSignature => Error::InvalidToken("Invalid token signature".to_string()),
        _ => Error::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Extracts user_id from a valid JWT token
pub fn get_user_id_from_token(token: &str, secret: &str) -> Result<Uuid> {
    let claims = verify_jwt(token, secret)?;
    Uuid::parse_str(&claims.id)
        .map_err(|_| Error::InvalidToken("Invalid user id in token".to_string()))
}

/// Issues and verifies the bearer tokens that bind a request to a user.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: SecretString,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(secret: SecretString, lifetime: Duration) -> Self {
        Self { secret, lifetime }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.clone(), Duration::days(config.expiration_days))
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Signs a token for `user_id` that expires after the configured lifetime.
    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken> {
        generate_jwt(user_id, self.secret.expose_secret(), self.lifetime)
    }

    /// Returns the user id bound to `token`, or `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Uuid> {
        get_user_id_from_token(token, self.secret.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing";

    fn service() -> TokenService {
        TokenService::new(SECRET.to_string().into(), Duration::days(7))
    }

    #[test]
    fn test_generate_jwt() {
        let user_id = Uuid::now_v7();
        let issued = generate_jwt(user_id, SECRET, Duration::days(7)).unwrap();
        assert!(!issued.token.is_empty());
        assert!(issued.token.contains('.'));
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let before = Utc::now();
        let issued = service().issue(Uuid::now_v7()).unwrap();
        let claims = verify_jwt(&issued.token, SECRET).unwrap();

        assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
        assert!(issued.expires_at >= before + Duration::days(7) - Duration::seconds(1));
    }

    #[test]
    fn test_verify_jwt_valid() {
        let user_id = Uuid::now_v7();
        let issued = generate_jwt(user_id, SECRET, Duration::days(7)).unwrap();
        let claims = verify_jwt(&issued.token, SECRET).unwrap();
        assert_eq!(claims.id, user_id.to_string());
    }

    #[test]
    fn test_verify_jwt_invalid_signature() {
        let issued = generate_jwt(Uuid::now_v7(), SECRET, Duration::days(7)).unwrap();
        let result = verify_jwt(&issued.token, "wrong-secret");
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }

    #[test]
    fn test_verify_jwt_invalid_format() {
        let result = verify_jwt("invalid.token.here", SECRET);
        assert!(matches!(result, Err(Error::InvalidToken(_))));
    }

    #[test]
    fn test_verify_jwt_expired() {
        let issued = generate_jwt(Uuid::now_v7(), SECRET, Duration::seconds(-60)).unwrap();
        let result = verify_jwt(&issued.token, SECRET);
        assert!(matches!(result, Err(Error::InvalidToken(msg)) if msg.contains("expired")));
    }

    #[test]
    fn test_token_never_resolves_to_another_user() {
        let service = service();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        let alice_token = service.issue(alice).unwrap().token;
        let bob_token = service.issue(bob).unwrap().token;

        assert_eq!(service.verify(&alice_token).unwrap(), alice);
        assert_eq!(service.verify(&bob_token).unwrap(), bob);
        assert_ne!(service.verify(&alice_token).unwrap(), bob);
    }

    #[test]
    fn test_tampered_payload_fails() {
        let service = service();
        let token = service.issue(Uuid::now_v7()).unwrap().token;
        let other = service.issue(Uuid::now_v7()).unwrap().token;

        // Splice the second token's payload onto the first token's signature
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(service.verify(&forged).is_err());
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let claims = Claims {
            id: "not-a-uuid".to_string(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        assert!(matches!(
            get_user_id_from_token(&token, SECRET),
            Err(Error::InvalidToken(_))
        ));
    }
}
