use serde::{Deserialize, Serialize};

use crate::scoring::rules::{Outcome, PredictedScore};

/// Community view of a match: how predictions split and the average call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total: i64,
    pub home_wins: i64,
    pub draws: i64,
    pub away_wins: i64,
    pub avg_home_score: f64,
    pub avg_away_score: f64,
}

impl PredictionStats {
    pub fn from_predictions(predictions: &[PredictedScore]) -> Self {
        if predictions.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            total: predictions.len() as i64,
            ..Self::default()
        };
        let (mut home_goals, mut away_goals) = (0i64, 0i64);

        for prediction in predictions {
            match prediction.result {
                Outcome::Home => stats.home_wins += 1,
                Outcome::Draw => stats.draws += 1,
                Outcome::Away => stats.away_wins += 1,
            }
            home_goals += i64::from(prediction.home);
            away_goals += i64::from(prediction.away);
        }

        stats.avg_home_score = round_to_one_decimal(home_goals as f64 / stats.total as f64);
        stats.avg_away_score = round_to_one_decimal(away_goals as f64 / stats.total as f64);
        stats
    }
}

fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predicted(home: i32, away: i32, result: Outcome) -> PredictedScore {
        PredictedScore { home, away, result }
    }

    #[test]
    fn counts_outcomes_and_averages_scores() {
        let stats = PredictionStats::from_predictions(&[
            predicted(2, 1, Outcome::Home),
            predicted(3, 0, Outcome::Home),
            predicted(1, 1, Outcome::Draw),
        ]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.home_wins, 2);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.away_wins, 0);
        assert_eq!(stats.avg_home_score, 2.0);
        assert_eq!(stats.avg_away_score, 0.7);
    }

    #[test]
    fn no_predictions_yields_zeroes() {
        assert_eq!(PredictionStats::from_predictions(&[]), PredictionStats::default());
    }

    #[test]
    fn averages_round_to_one_decimal() {
        let stats = PredictionStats::from_predictions(&[
            predicted(1, 0, Outcome::Home),
            predicted(1, 0, Outcome::Home),
            predicted(2, 0, Outcome::Home),
        ]);
        // 4 / 3 = 1.333..
        assert_eq!(stats.avg_home_score, 1.3);
    }
}
