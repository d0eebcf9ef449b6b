use std::collections::BTreeSet;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db::matches::finished_matches;
use crate::db::predictions::predictions_to_score;
use crate::models::matches::Match;
use crate::models::score::ScoringSummary;
use crate::scoring::rules::{score_prediction, FinalScore};

/// Turns official results into awarded points.
///
/// Points live per (user, match) in `match_scores`; `user_scores` is always
/// re-derived from them, so scoring the same match twice never double counts.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    pool: PgPool,
}

impl ScoringEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bring awarded points in line with the match as it stands: score it when it
    /// is finished with a result, otherwise withdraw anything awarded earlier.
    pub async fn sync_match_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        fixture: &Match,
    ) -> Result<ScoringSummary, sqlx::Error> {
        match fixture.final_score() {
            Some(final_score) => Self::score_match_in_tx(tx, fixture.id, final_score).await,
            None => {
                let affected = Self::clear_match_in_tx(tx, fixture.id).await?;
                if !affected.is_empty() {
                    tracing::info!(
                        "Withdrew points of match {} from {} users",
                        fixture.id,
                        affected.len()
                    );
                }
                Self::refresh_user_scores_in_tx(tx, &affected).await?;
                Ok(ScoringSummary::default())
            }
        }
    }

    /// Re-score every prediction on a match against its final score
    #[tracing::instrument(name = "Scoring match", skip(tx))]
    pub async fn score_match_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
        final_score: FinalScore,
    ) -> Result<ScoringSummary, sqlx::Error> {
        let mut affected: BTreeSet<Uuid> = Self::clear_match_in_tx(tx, match_id)
            .await?
            .into_iter()
            .collect();

        let predictions = predictions_to_score(tx, match_id).await?;
        let mut summary = ScoringSummary::default();

        for prediction in &predictions {
            let awarded = score_prediction(prediction.predicted_score(), final_score);

            sqlx::query(
                r#"
                INSERT INTO match_scores (user_id, match_id, points, correct_result, exact_score)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(prediction.user_id)
            .bind(match_id)
            .bind(awarded.points)
            .bind(awarded.correct_result)
            .bind(awarded.exact_score)
            .execute(&mut **tx)
            .await?;

            summary.predictions_scored += 1;
            summary.points_awarded += i64::from(awarded.points);
            if awarded.exact_score {
                summary.exact_scores += 1;
            }
            if awarded.correct_result {
                summary.correct_results += 1;
            }
            affected.insert(prediction.user_id);
        }

        let affected: Vec<Uuid> = affected.into_iter().collect();
        Self::refresh_user_scores_in_tx(tx, &affected).await?;

        tracing::info!(
            "🏆 Scored match {} ({}-{}): {} predictions, {} exact scores, {} correct results, {} points",
            match_id,
            final_score.home,
            final_score.away,
            summary.predictions_scored,
            summary.exact_scores,
            summary.correct_results,
            summary.points_awarded
        );

        Ok(summary)
    }

    /// Drop the points awarded for a match, returning the users who had any
    pub async fn clear_match_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        match_id: Uuid,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>("DELETE FROM match_scores WHERE match_id = $1 RETURNING user_id")
            .bind(match_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Re-derive the aggregate rows of `user_ids` from their per-match points.
    /// Users left without scored matches lose their row and read as zero.
    pub async fn refresh_user_scores_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("DELETE FROM user_scores WHERE user_id = ANY($1)")
            .bind(user_ids.to_vec())
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO user_scores (user_id, total_points, correct_results, correct_scores, total_predictions, updated_at)
            SELECT
                user_id,
                SUM(points)::INT,
                (COUNT(*) FILTER (WHERE correct_result))::INT,
                (COUNT(*) FILTER (WHERE exact_score))::INT,
                COUNT(*)::INT,
                NOW()
            FROM match_scores
            WHERE user_id = ANY($1)
            GROUP BY user_id
            "#,
        )
        .bind(user_ids.to_vec())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Delete every awarded point and aggregate
    #[tracing::instrument(name = "Resetting all scores", skip(self))]
    pub async fn reset_all(&self) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM match_scores").execute(&mut *tx).await?;
        let cleared = sqlx::query("DELETE FROM user_scores")
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        tracing::warn!("All scores reset ({} user aggregates removed)", cleared);
        Ok(cleared)
    }

    /// Reset, then score every finished match from scratch
    #[tracing::instrument(name = "Recalculating all scores", skip(self))]
    pub async fn recalculate_all(&self) -> Result<ScoringSummary, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM match_scores").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM user_scores").execute(&mut *tx).await?;

        let mut total = ScoringSummary::default();
        for fixture in finished_matches(&mut tx).await? {
            if let Some(final_score) = fixture.final_score() {
                let summary = Self::score_match_in_tx(&mut tx, fixture.id, final_score).await?;
                total.absorb(&summary);
            }
        }

        tx.commit().await?;
        tracing::info!("Recalculated all scores: {} predictions scored", total.predictions_scored);
        Ok(total)
    }
}
