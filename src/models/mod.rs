pub mod auth;
pub mod comment;
pub mod common;
pub mod matches;
pub mod prediction;
pub mod score;
pub mod user;
