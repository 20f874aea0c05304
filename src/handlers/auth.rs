use axum::{
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Json, Response},
};
use crate::{
    error::Result,
    handlers::{success, success_message},
    models::users::{AuthResult, LoginUser, RegisterUser},
    services::{
        cookies::{build_clear_session_cookie, build_session_cookie},
        users,
    },
    state::AppState,
};

/// Response that carries a JSON body and sets the session cookie
pub struct SessionResponse {
    status: StatusCode,
    json_body: Json<serde_json::Value>,
    cookie: String,
}

impl SessionResponse {
    fn authenticated(status: StatusCode, result: AuthResult, state: &AppState) -> Self {
        let cookie = build_session_cookie(&result.token, &state.config.cookies, state.tokens.lifetime());
        Self {
            status,
            json_body: success(serde_json::json!({
                "user": result.user,
                "token": result.token,
            })),
            cookie,
        }
    }
}

impl IntoResponse for SessionResponse {
    fn into_response(self) -> Response {
        let (mut parts, body) = (self.status, self.json_body).into_response().into_parts();

        if let Ok(cookie) = HeaderValue::from_str(&self.cookie) {
            parts.headers.append(SET_COOKIE, cookie);
        }

        Response::from_parts(parts, body)
    }
}

/// POST /auth/register
///
/// Registers a new user and signs them in.
///
/// # Request Body
/// - `name`: Display name
/// - `email`: Email address (must be unique)
/// - `password`: Password (8 to 128 characters)
///
/// # Returns
/// `{"status": "success", "data": {"user", "token"}}` and a session cookie.
///
/// # HTTP Status Codes
/// - `201 CREATED`: User registered
/// - `400 BAD_REQUEST`: Validation error or email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterUser>, JsonRejection>,
) -> Result<SessionResponse> {
    let Json(request) = payload?;

    let result = users::register_user(state.store.as_ref(), &state.tokens, request).await?;

    Ok(SessionResponse::authenticated(StatusCode::CREATED, result, &state))
}

/// POST /auth/login
///
/// Authenticates a user with email and password.
///
/// # Returns
/// `{"status": "success", "data": {"user", "token"}}` and a session cookie.
/// Browser clients use the cookie; API clients send the token as
/// `Authorization: Bearer <token>`.
///
/// # HTTP Status Codes
/// - `200 OK`: Authentication successful
/// - `400 BAD_REQUEST`: Invalid email or password
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginUser>, JsonRejection>,
) -> Result<SessionResponse> {
    let Json(request) = payload?;

    let result = users::login_user(state.store.as_ref(), &state.tokens, request).await?;

    Ok(SessionResponse::authenticated(StatusCode::OK, result, &state))
}

/// POST /auth/logout
///
/// Clears the session cookie. Issued tokens stay valid until they expire.
pub async fn logout(State(state): State<AppState>) -> SessionResponse {
    SessionResponse {
        status: StatusCode::OK,
        json_body: success_message("Logged out successfully"),
        cookie: build_clear_session_cookie(&state.config.cookies),
    }
}
