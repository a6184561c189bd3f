pub mod auth;
pub mod cache;
pub mod fanout;
pub mod language;
pub mod shared;
pub mod translation;
pub mod user;
