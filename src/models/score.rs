use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Aggregate of a user's scored predictions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserScore {
    pub user_id: Uuid,
    pub total_points: i32,
    pub correct_results: i32,
    pub correct_scores: i32,
    pub total_predictions: i32,
}

impl UserScore {
    /// Zero-valued record for users without scored predictions
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_points: 0,
            correct_results: 0,
            correct_scores: 0,
            total_predictions: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    #[sqlx(skip)]
    pub position: i64,
    pub user_id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub profile_photo: Option<String>,
    pub total_points: i32,
    pub correct_results: i32,
    pub correct_scores: i32,
    pub total_predictions: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklyWinner {
    pub user_id: Uuid,
    pub username: String,
    pub profile_photo: Option<String>,
    pub week: i32,
    pub weekly_points: i32,
}

/// Outcome of one scoring run over a match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringSummary {
    pub predictions_scored: i64,
    pub exact_scores: i64,
    pub correct_results: i64,
    pub points_awarded: i64,
}

impl ScoringSummary {
    pub fn absorb(&mut self, other: &ScoringSummary) {
        self.predictions_scored += other.predictions_scored;
        self.exact_scores += other.exact_scores;
        self.correct_results += other.correct_results;
        self.points_awarded += other.points_awarded;
    }
}
