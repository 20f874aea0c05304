//! Shared test helper functions

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use uuid::Uuid;

use crate::common::TestApp;

pub const TEST_PASSWORD: &str = "SecurePass123!";

/// A registered user and the token they were issued
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

/// Generates a unique test email
pub fn generate_test_email() -> String {
    format!("test_{}@example.com", Uuid::now_v7().simple())
}

/// `Authorization` header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Registers a new user and returns their id and token
///
/// Uses the anonymous client so the shared cookie jar is left alone.
pub async fn register_user(app: &TestApp, name: &str) -> TestUser {
    let email = generate_test_email();

    let response = app
        .anonymous_client()
        .post(app.url("/auth/register"))
        .json(&serde_json::json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    TestUser {
        id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
        name: name.to_string(),
        email,
        token: body["data"]["token"].as_str().unwrap().to_string(),
    }
}

/// A multipart form describing a complete movie with a PNG poster
pub fn movie_form(title: &str) -> Form {
    Form::new()
        .text("title", title.to_string())
        .text("overview", "A thief who steals corporate secrets through dreams.")
        .text("releaseYear", "2010")
        .text("runtime", "148")
        .text("genres", r#"["Action","Sci-Fi"]"#)
        .part("image", poster_part())
}

/// A small file part that passes the image type checks
pub fn poster_part() -> Part {
    Part::bytes(b"\x89PNG\r\n\x1a\nnot-really-a-png".to_vec())
        .file_name("poster.png")
        .mime_str("image/png")
        .unwrap()
}

/// Creates a movie as `user` and returns the created movie JSON
pub async fn create_movie(app: &TestApp, user: &TestUser, title: &str) -> Value {
    let response = app
        .client
        .post(app.url("/movies"))
        .header("Authorization", bearer(&user.token))
        .multipart(movie_form(title))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    body["data"].clone()
}

/// Adds a movie to `user`'s watchlist and returns the raw response
pub async fn add_to_watchlist(app: &TestApp, user: &TestUser, body: Value) -> reqwest::Response {
    app.client
        .post(app.url("/watchlist"))
        .header("Authorization", bearer(&user.token))
        .json(&body)
        .send()
        .await
        .unwrap()
}
