pub mod movies;
pub mod requests;
pub mod users;
pub mod watchlist;
