use std::{path::PathBuf, sync::Arc};

use movietrack::{
    AppState, Config, build_router,
    config::StoreBackend,
    services::images::LocalImageStore,
    store::{MemoryStore, SharedStore},
};
use reqwest::{Client, redirect::Policy};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// HTTP test application wrapper
///
/// Runs the real router on a random port against a fresh in-memory store
/// and a temporary upload directory. Each test gets its own instance, so
/// tests can run in parallel.
pub struct TestApp {
    /// Server base URL (e.g., "http://127.0.0.1:54321")
    pub address: String,
    /// HTTP client with a cookie store, like a browser
    pub client: Client,
    /// Application config
    pub config: Config,
    /// Direct handle on the store for assertions
    pub store: Arc<MemoryStore>,
    pub upload_dir: PathBuf,
}

impl TestApp {
    /// Create a new HTTP test app with server on random port
    ///
    /// # Example
    /// ```rust
    /// #[tokio::test]
    /// async fn test_health_endpoint() {
    ///     let app = TestApp::new().await;
    ///
    ///     let response = app.client.get(app.url("/health")).send().await.unwrap();
    ///
    ///     assert_eq!(response.status(), 200);
    /// }
    /// ```
    pub async fn new() -> Self {
        let upload_dir = std::env::temp_dir().join(format!("movietrack-test-{}", Uuid::now_v7()));

        let mut config = Config::default();
        config.database.backend = StoreBackend::Memory;
        config.jwt.secret = TEST_JWT_SECRET.to_string().into();
        config.uploads.dir = upload_dir.to_string_lossy().into_owned();

        let store = Arc::new(MemoryStore::new());
        let shared: SharedStore = store.clone();

        let images = LocalImageStore::from_config(&config.uploads);
        images.init().await.expect("Failed to create upload directory");

        let app = build_router(AppState::new(shared, Arc::new(images), config.clone()));

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            address,
            client: Self::build_client(true),
            config,
            store,
            upload_dir,
        }
    }

    /// A client with no cookie store, for requests that must carry no session
    pub fn anonymous_client(&self) -> Client {
        Self::build_client(false)
    }

    /// Get the full URL for an endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    fn build_client(cookies: bool) -> Client {
        Client::builder()
            .redirect(Policy::none())
            .cookie_store(cookies)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}
