use sqlx::PgPool;
use uuid::Uuid;

use crate::models::score::{LeaderboardEntry, UserScore, WeeklyWinner};

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 50;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Ties on points are broken by exact scores, then by registration order
const STANDINGS_ORDER: &str =
    "us.total_points DESC, us.correct_scores DESC, u.created_at ASC, u.id ASC";

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

/// Number entries 1..n in the order given
pub fn assign_positions(entries: &mut [LeaderboardEntry]) {
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.position = index as i64 + 1;
    }
}

/// Read side of the scoring tables
#[derive(Debug, Clone)]
pub struct LeaderboardService {
    pool: PgPool,
}

impl LeaderboardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, limit: i64) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        let mut entries = sqlx::query_as::<_, LeaderboardEntry>(&format!(
            r#"
            SELECT
                u.id AS user_id,
                u.username,
                u.name,
                u.profile_photo,
                us.total_points,
                us.correct_results,
                us.correct_scores,
                us.total_predictions
            FROM user_scores us
            INNER JOIN users u ON u.id = us.user_id
            ORDER BY {STANDINGS_ORDER}
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        assign_positions(&mut entries);
        Ok(entries)
    }

    /// Aggregate for one user; zero-valued when nothing has been scored yet
    pub async fn user_score(&self, user_id: Uuid) -> Result<UserScore, sqlx::Error> {
        let score = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT user_id, total_points, correct_results, correct_scores, total_predictions
            FROM user_scores
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(score.unwrap_or_else(|| UserScore::empty(user_id)))
    }

    /// Best scorer over the matches of one gameweek, if anyone scored there
    pub async fn weekly_winner(&self, week: i32) -> Result<Option<WeeklyWinner>, sqlx::Error> {
        sqlx::query_as::<_, WeeklyWinner>(
            r#"
            SELECT
                u.id AS user_id,
                u.username,
                u.profile_photo,
                m.week,
                SUM(ms.points)::INT AS weekly_points
            FROM match_scores ms
            INNER JOIN matches m ON m.id = ms.match_id
            INNER JOIN users u ON u.id = ms.user_id
            WHERE m.week = $1
            GROUP BY u.id, m.week
            HAVING SUM(ms.points) > 0
            ORDER BY
                SUM(ms.points) DESC,
                COUNT(*) FILTER (WHERE ms.exact_score) DESC,
                u.created_at ASC,
                u.id ASC
            LIMIT 1
            "#,
        )
        .bind(week)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, total_points: i32) -> LeaderboardEntry {
        LeaderboardEntry {
            position: 0,
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            name: None,
            profile_photo: None,
            total_points,
            correct_results: 0,
            correct_scores: 0,
            total_predictions: 0,
        }
    }

    #[test]
    fn limit_defaults_and_is_bounded() {
        assert_eq!(clamp_limit(None), DEFAULT_LEADERBOARD_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LEADERBOARD_LIMIT);
    }

    #[test]
    fn positions_follow_the_given_order() {
        let mut entries = vec![entry("first", 10), entry("second", 7), entry("third", 7)];
        assign_positions(&mut entries);

        let positions: Vec<(&str, i64)> = entries
            .iter()
            .map(|e| (e.username.as_str(), e.position))
            .collect();
        assert_eq!(positions, vec![("first", 1), ("second", 2), ("third", 3)]);
    }
}
