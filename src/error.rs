use thiserror::Error;
use std::collections::HashMap;
use serde::{Serialize, Deserialize};

// Import Axum types for HTTP response conversion
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Message returned for every failure that is not an expected domain error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned for both unknown emails and wrong passwords.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Structured validation errors with field-level error mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrors {
    Single { field: String, message: String },
    Multiple { fields: HashMap<String, String> },
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        ValidationErrors::Single {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrors::Single { field, message } => write!(f, "{}: {}", field, message),
            ValidationErrors::Multiple { fields } => {
                let mut entries: Vec<_> = fields.iter().collect();
                entries.sort();
                let joined: Vec<String> = entries
                    .into_iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A failed schema migration.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A filesystem error (image storage).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error with field-level details.
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// A malformed request (missing upload, unparsable form field).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but not the owner of the resource.
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// A conflict error (resource already exists).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Login failed. Deliberately carries no detail about which check failed.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request carries no usable identity.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A token failed signature, format or expiry checks.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::Sqlx(_)
            | Error::Migrate(_)
            | Error::Io(_)
            | Error::Internal(_)
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed JSON bodies are client errors.
impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

/// Path parameters that do not parse (e.g. a non-UUID id) are client errors.
impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for Error {
    fn from(rejection: MultipartRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for Error {
    fn from(error: MultipartError) -> Self {
        Error::BadRequest(format!("Invalid multipart body: {}", error.body_text()))
    }
}

/// Convert custom Error to HTTP response
///
/// Expected domain failures carry their own message. Everything else is
/// logged here and answered with a generic 500 body.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            Error::Validation(errors) => {
                match errors {
                    ValidationErrors::Single { field, message } => {
                        serde_json::json!({
                            "error": message,
                            "code": "VALIDATION_ERROR",
                            "fields": {
                                field: message
                            }
                        })
                    }
                    ValidationErrors::Multiple { fields } => {
                        serde_json::json!({
                            "error": "Validation failed",
                            "code": "VALIDATION_ERROR",
                            "fields": fields
                        })
                    }
                }
            }
            Error::BadRequest(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "BAD_REQUEST"
                })
            }
            Error::NotFound(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "NOT_FOUND"
                })
            }
            Error::Forbidden(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "FORBIDDEN"
                })
            }
            Error::Conflict(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "CONFLICT"
                })
            }
            Error::InvalidCredentials => {
                serde_json::json!({
                    "error": INVALID_CREDENTIALS_MESSAGE,
                    "code": "INVALID_CREDENTIALS"
                })
            }
            Error::Unauthorized(msg) | Error::InvalidToken(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "UNAUTHORIZED"
                })
            }
            Error::Sqlx(_)
            | Error::Migrate(_)
            | Error::Io(_)
            | Error::Internal(_)
            | Error::Config(_) => {
                tracing::error!(error = %self, "Unhandled error while serving request");
                serde_json::json!({
                    "error": INTERNAL_ERROR_MESSAGE,
                    "code": "INTERNAL_ERROR"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
