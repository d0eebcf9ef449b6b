use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::rules::{Outcome, PredictedScore};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Prediction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub predicted_home_score: i32,
    pub predicted_away_score: i32,
    #[sqlx(try_from = "String")]
    pub predicted_result: Outcome,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prediction {
    pub fn predicted_score(&self) -> PredictedScore {
        PredictedScore {
            home: self.predicted_home_score,
            away: self.predicted_away_score,
            result: self.predicted_result,
        }
    }
}

/// Prediction enriched with the predicting user's display fields
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PredictionWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub prediction: Prediction,
    pub username: String,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitPredictionRequest {
    pub match_id: Uuid,
    pub predicted_home_score: i32,
    pub predicted_away_score: i32,
    pub predicted_result: String,
}

impl SubmitPredictionRequest {
    /// Shape checks only; whether the window is still open is decided against the match
    pub fn validate(&self) -> Result<PredictedScore, AppError> {
        if self.predicted_home_score < 0 || self.predicted_away_score < 0 {
            return Err(AppError::validation("Predicted scores must be non-negative"));
        }
        let result = self
            .predicted_result
            .parse::<Outcome>()
            .map_err(|_| AppError::validation("Predicted result must be one of home, draw, away"))?;

        Ok(PredictedScore {
            home: self.predicted_home_score,
            away: self.predicted_away_score,
            result,
        })
    }
}
