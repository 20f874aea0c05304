use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::services::cookies::CookieConfig;

/// Signing key used when none is configured. Only the memory backend may run with it.
pub const DEVELOPMENT_JWT_SECRET: &str = "development-secret-change-me";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cookies: CookieConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which implementation backs the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens
    #[serde(skip_serializing)]
    pub secret: SecretString,
    /// Token lifetime in days
    pub expiration_days: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Directory uploaded images are written to
    pub dir: String,
    /// URL prefix the upload directory is served under
    pub public_url: String,
    /// Maximum accepted request body for multipart uploads
    pub max_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        // Secrets are skipped when serializing, so the defaults source
        // cannot carry them; they are set as explicit defaults instead.
        let defaults = Self::default();
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .set_default("database.password", defaults.database.password.expose_secret())?
            .set_default("jwt.secret", defaults.jwt.secret.expose_secret())?
            // Override with environment variables using `MOVIETRACK__` prefix and `__` separator
            // e.g., MOVIETRACK__JWT__SECRET="change-me"
            .add_source(
                config::Environment::with_prefix("MOVIETRACK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server must not start with.
    ///
    /// A Postgres-backed server holds real accounts, so it requires an
    /// explicitly configured JWT secret (`MOVIETRACK__JWT__SECRET`).
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let secret = self.jwt.secret.expose_secret();

        if secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }

        if self.database.backend == StoreBackend::Postgres && secret == DEVELOPMENT_JWT_SECRET {
            return Err(config::ConfigError::Message(
                "jwt.secret is not set; set MOVIETRACK__JWT__SECRET before using the postgres backend"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Constructs the database connection string.
    pub fn connection_string(&self) -> SecretString {
        SecretString::from(format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

// Default values for the database configuration
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            user: "postgres".to_string(),
            password: "password".to_string().into(),
            host: "localhost".to_string(),
            port: 5432,
            database: "movietrack".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEVELOPMENT_JWT_SECRET.to_string().into(),
            expiration_days: 7,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "./uploads".to_string(),
            public_url: "/uploads".to_string(),
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Secrets are skipped by their serde attributes
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
