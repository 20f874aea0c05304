#![allow(dead_code)]

pub mod database;
pub mod helpers;
pub mod test_app;

// Each test binary uses a different subset of these
#[allow(unused_imports)]
pub use database::TestDb;
#[allow(unused_imports)]
pub use helpers::{
    TEST_PASSWORD, TestUser, add_to_watchlist, bearer, create_movie, generate_test_email,
    movie_form, poster_part, register_user,
};
#[allow(unused_imports)]
pub use test_app::{TEST_JWT_SECRET, TestApp};
