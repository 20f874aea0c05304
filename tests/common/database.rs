use movietrack::{
    DbPool, database,
    models::{
        movies::{Movie, NewMovie},
        users::{NewUser, User},
    },
    store::{MovieStore, PgStore, UserStore},
};
use sqlx::PgPool;
use uuid::Uuid;

/// Connection string of the database the Postgres tests run against
pub const TEST_DATABASE_URL_VAR: &str = "MOVIETRACK_TEST_DATABASE_URL";

/// Postgres-backed test database with an isolated data namespace
///
/// Every user a test creates gets an email starting with `test_<test_name>+`,
/// so parallel tests never see each other's rows. Movies and watchlist items
/// hang off those users and are removed with them by the foreign key cascade.
pub struct TestDb {
    pub pool: DbPool,
    pub store: PgStore,
    test_prefix: String,
}

impl TestDb {
    /// Connects, applies migrations and clears leftovers from earlier runs.
    ///
    /// Returns `None` when `MOVIETRACK_TEST_DATABASE_URL` is unset, so the
    /// suite still passes on machines without Postgres.
    ///
    /// # Example
    /// ```rust
    /// #[tokio::test]
    /// async fn test_duplicate_email_is_conflict() {
    ///     let Some(test_db) = TestDb::new("test_duplicate_email_is_conflict").await else {
    ///         return;
    ///     };
    ///     // ... test logic
    ///     test_db.cleanup().await;
    /// }
    /// ```
    pub async fn new(test_name: &str) -> Option<Self> {
        dotenvy::dotenv().ok();

        let Ok(url) = std::env::var(TEST_DATABASE_URL_VAR) else {
            eprintln!("skipping {test_name}: {TEST_DATABASE_URL_VAR} is not set");
            return None;
        };

        let pool = PgPool::connect(&url)
            .await
            .expect("Failed to connect to database");
        database::migrate(&pool)
            .await
            .expect("Failed to run migrations");

        let test_db = Self {
            store: PgStore::new(pool.clone()),
            pool,
            test_prefix: format!("test_{}", test_name),
        };
        test_db.cleanup().await;

        Some(test_db)
    }

    /// Get the test prefix for this test instance
    pub fn test_prefix(&self) -> &str {
        &self.test_prefix
    }

    /// A unique email inside this test's namespace
    pub fn generate_email(&self) -> String {
        format!("{}+{}@example.com", self.test_prefix, Uuid::now_v7().simple())
    }

    /// Removes every user in this test's namespace, cascading to their data
    pub async fn cleanup(&self) {
        sqlx::query("DELETE FROM users WHERE email LIKE $1")
            .bind(format!("{}+%", self.test_prefix))
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test data");
    }

    pub async fn create_user(&self, name: &str) -> User {
        self.store
            .create_user(NewUser {
                name: name.to_string(),
                email: self.generate_email(),
                password_hash: "not-a-real-hash".to_string(),
            })
            .await
            .expect("Failed to create test user")
    }

    pub async fn create_movie(&self, owner: &User, title: &str) -> Movie {
        self.store
            .create_movie(NewMovie {
                title: title.to_string(),
                overview: Some("A crew boards a derelict ship.".to_string()),
                release_year: 1979,
                runtime: Some(117),
                genres: vec!["Horror".to_string(), "Sci-Fi".to_string()],
                image_url: "/uploads/poster.png".to_string(),
                created_by: owner.id,
            })
            .await
            .expect("Failed to create test movie")
    }
}
