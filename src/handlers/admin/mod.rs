pub mod match_handler;
pub mod prediction_handler;
pub mod score_handler;
pub mod user_handler;
