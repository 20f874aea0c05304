//! JWT authentication middleware
//!
//! Guards protected routes: resolves the caller from a bearer token or
//! session cookie and attaches them to the request.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Cookie, HeaderMapExt};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::users::User,
    services::cookies::{LEGACY_TOKEN_COOKIE, extract_token},
    state::AppState,
};

/// Authenticated user extracted from a verified token
///
/// This struct is added to request extensions by the JWT middleware.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    /// User's unique identifier
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// JWT authentication middleware
///
/// # Token Sources
/// - **Authorization header** (API clients): `Bearer <token>`
/// - **Cookie** (browser clients): the session cookie, then `token`
///
/// # Behavior
/// 1. Extracts the token (header takes priority)
/// 2. Verifies signature and expiry
/// 3. Loads the user; a token for a deleted user is rejected
/// 4. Adds `AuthenticatedUser` to request extensions
///
/// Every rejection is a 401. Store failures propagate as 500.
///
/// # Usage
/// ```ignore
/// Router::new()
///     .route("/protected", get(protected_handler))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         jwt_auth_middleware,
///     ))
/// ```
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = token_from_headers(&headers, &state.config.cookies.name)
        .ok_or_else(|| Error::Unauthorized("Not authorized, no token".to_string()))?;

    let user_id = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected token");
        Error::Unauthorized("Not authorized, token failed".to_string())
    })?;

    let user = state
        .store
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| Error::Unauthorized("Not authorized, no user".to_string()))?;

    request.extensions_mut().insert(AuthenticatedUser::from(user));
    Ok(next.run(request).await)
}

/// Finds the token in the Authorization header or the session cookies
fn token_from_headers(headers: &HeaderMap, session_cookie: &str) -> Option<String> {
    let auth_header = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());

    let cookies = headers.typed_get::<Cookie>();
    let cookie_value = cookies.as_ref().and_then(|cookies| {
        cookies
            .get(session_cookie)
            .filter(|value| !value.is_empty())
            .or_else(|| cookies.get(LEGACY_TOKEN_COOKIE))
    });

    extract_token(auth_header, cookie_value)
}
