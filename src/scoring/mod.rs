pub mod engine;
pub mod leaderboard;
pub mod rules;
pub mod stats;
pub mod window;

pub use engine::ScoringEngine;
pub use leaderboard::LeaderboardService;
