pub mod cookies;
pub mod images;
pub mod jwt;
pub mod movies;
pub mod ownership;
pub mod users;
pub mod watchlist;
