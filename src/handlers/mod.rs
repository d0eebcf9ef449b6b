pub mod admin;
pub mod auth_handler;
pub mod backend_health_handler;
pub mod comment_handler;
pub mod leaderboard_handler;
pub mod match_handler;
pub mod prediction_handler;
pub mod profile;
pub mod registration_handler;
