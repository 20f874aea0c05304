use chrono::Duration;

/// Cookie the session token is written to.
pub const SESSION_COOKIE: &str = "jwt";

/// Older clients send the token under this name; it is read after the session cookie.
pub const LEGACY_TOKEN_COOKIE: &str = "token";

/// Cookie security configuration
///
/// Controls how the session cookie is created for browser clients
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CookieConfig {
    /// Name of the session cookie (default: "jwt")
    pub name: String,
    /// Secure flag ensures HTTPS-only transmission (should be true in production)
    pub secure: bool,
    /// SameSite attribute for CSRF protection
    pub same_site: SameSite,
    /// Path attribute to limit cookie scope
    pub path: String,
}

/// SameSite cookie attribute for CSRF protection
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Strict mode - cookie not sent with cross-site requests
    Strict,
    /// Lax mode - cookie sent with top-level navigations
    Lax,
    /// None mode - cookie sent with all requests (requires Secure)
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE.to_string(),
            secure: false, // Set to true in production
            same_site: SameSite::Strict,
            path: "/".to_string(),
        }
    }
}

/// Extracts the session token from either the Authorization header or a cookie
///
/// Priority order:
/// 1. `Authorization: Bearer <token>` (API clients)
/// 2. Cookie value (browser clients)
///
/// A header that is present but not a well-formed bearer credential is
/// ignored, and the cookie is consulted instead. Returns `None` when neither
/// source yields a non-empty token.
///
/// # Example
/// ```rust
/// use movietrack::services::cookies::extract_token;
///
/// let token = extract_token(Some("Bearer eyJhbGc..."), Some("cookie_token_value"));
/// assert_eq!(token.as_deref(), Some("eyJhbGc..."));
/// ```
pub fn extract_token(auth_header: Option<&str>, cookie_value: Option<&str>) -> Option<String> {
    // Priority 1: Authorization header
    if let Some(token) = auth_header.and_then(|header| header.strip_prefix("Bearer ")) {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token.to_string());
        }
    }

    // Priority 2: Cookie
    cookie_value
        .map(str::trim)
        .filter(|cookie| !cookie.is_empty())
        .map(str::to_string)
}

/// Builds a Set-Cookie header value carrying the session token
///
/// # Example
/// ```rust
/// use movietrack::services::cookies::{build_session_cookie, CookieConfig};
///
/// let cookie = build_session_cookie("my_token", &CookieConfig::default(), chrono::Duration::days(7));
/// assert_eq!(cookie, "jwt=my_token; HttpOnly; SameSite=Strict; Path=/; Max-Age=604800");
/// ```
pub fn build_session_cookie(token: &str, config: &CookieConfig, max_age: Duration) -> String {
    format!(
        "{}={}; HttpOnly{}; SameSite={}; Path={}; Max-Age={}",
        config.name,
        token,
        if config.secure { "; Secure" } else { "" },
        config.same_site.as_str(),
        config.path,
        max_age.num_seconds()
    )
}

/// Builds a Set-Cookie header value that clears the session cookie
///
/// The value is emptied and the cookie expires immediately.
pub fn build_clear_session_cookie(config: &CookieConfig) -> String {
    format!(
        "{}=; HttpOnly{}; SameSite={}; Path={}; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
        config.name,
        if config.secure { "; Secure" } else { "" },
        config.same_site.as_str(),
        config.path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_from_header() {
        let token = extract_token(Some("Bearer my-token"), None);
        assert_eq!(token.as_deref(), Some("my-token"));
    }

    #[test]
    fn test_extract_token_from_cookie() {
        let token = extract_token(None, Some("my-token"));
        assert_eq!(token.as_deref(), Some("my-token"));
    }

    #[test]
    fn test_extract_token_priority_header_over_cookie() {
        let token = extract_token(Some("Bearer header-token"), Some("cookie-token"));
        assert_eq!(token.as_deref(), Some("header-token"));
    }

    #[test]
    fn test_extract_token_no_token() {
        assert_eq!(extract_token(None, None), None);
    }

    #[test]
    fn test_extract_token_empty_header_falls_back_to_cookie() {
        assert_eq!(extract_token(Some("Bearer "), None), None);
        let token = extract_token(Some("Bearer "), Some("cookie-token"));
        assert_eq!(token.as_deref(), Some("cookie-token"));
    }

    #[test]
    fn test_extract_token_invalid_header_format() {
        assert_eq!(extract_token(Some("Basic dXNlcjpwYXNz"), None), None);
    }

    #[test]
    fn test_extract_token_empty_cookie() {
        assert_eq!(extract_token(None, Some("")), None);
    }

    #[test]
    fn test_build_session_cookie() {
        let config = CookieConfig::default();

        let cookie = build_session_cookie("my-token", &config, Duration::days(7));
        assert!(cookie.starts_with("jwt=my-token"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn test_build_session_cookie_with_secure() {
        let config = CookieConfig {
            secure: true,
            same_site: SameSite::Lax,
            ..CookieConfig::default()
        };

        let cookie = build_session_cookie("my-token", &config, Duration::days(7));
        assert!(cookie.contains("; Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[test]
    fn test_build_clear_session_cookie() {
        let cookie = build_clear_session_cookie(&CookieConfig::default());
        assert!(cookie.starts_with("jwt=;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn test_cookie_config_default() {
        let config = CookieConfig::default();
        assert_eq!(config.name, "jwt");
        assert!(!config.secure);
        assert_eq!(config.same_site, SameSite::Strict);
        assert_eq!(config.path, "/");
    }
}
