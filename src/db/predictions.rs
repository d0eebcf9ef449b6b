use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::prediction::{Prediction, PredictionWithUser};
use crate::scoring::rules::PredictedScore;
use crate::scoring::window::PREDICTION_CUTOFF_MINUTES;

const PREDICTION_COLUMNS: &str = "id, user_id, match_id, predicted_home_score, predicted_away_score, predicted_result, created_at, updated_at";

const WITH_USER_SELECT: &str = r#"
    SELECT
        p.id, p.user_id, p.match_id, p.predicted_home_score, p.predicted_away_score,
        p.predicted_result, p.created_at, p.updated_at,
        u.username, u.profile_photo
    FROM predictions p
    INNER JOIN users u ON u.id = p.user_id
"#;

/// Insert or overwrite the user's single prediction for a match in one statement.
///
/// The match row is share-locked and re-checked inside the statement, so a
/// prediction cannot slip in after the window closed or the match was
/// finished. `None` means the match no longer accepts predictions.
pub async fn upsert_prediction(
    pool: &PgPool,
    user_id: Uuid,
    match_id: Uuid,
    predicted: &PredictedScore,
) -> Result<Option<Prediction>, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(&format!(
        r#"
        INSERT INTO predictions (id, user_id, match_id, predicted_home_score, predicted_away_score, predicted_result)
        SELECT $1, $2, m.id, $4, $5, $6
        FROM matches m
        WHERE m.id = $3
          AND NOT m.is_finished
          AND NOW() < m.match_date - make_interval(mins => $7::INT)
        FOR SHARE
        ON CONFLICT (user_id, match_id)
        DO UPDATE SET
            predicted_home_score = EXCLUDED.predicted_home_score,
            predicted_away_score = EXCLUDED.predicted_away_score,
            predicted_result = EXCLUDED.predicted_result,
            updated_at = NOW()
        RETURNING {PREDICTION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(match_id)
    .bind(predicted.home)
    .bind(predicted.away)
    .bind(predicted.result.as_str())
    .bind(PREDICTION_CUTOFF_MINUTES)
    .fetch_optional(pool)
    .await
}

pub async fn predictions_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<PredictionWithUser>, sqlx::Error> {
    sqlx::query_as::<_, PredictionWithUser>(&format!(
        "{WITH_USER_SELECT} WHERE p.user_id = $1 ORDER BY p.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn predictions_for_match(pool: &PgPool, match_id: Uuid) -> Result<Vec<PredictionWithUser>, sqlx::Error> {
    sqlx::query_as::<_, PredictionWithUser>(&format!(
        "{WITH_USER_SELECT} WHERE p.match_id = $1 ORDER BY p.created_at ASC"
    ))
    .bind(match_id)
    .fetch_all(pool)
    .await
}

pub async fn all_predictions(pool: &PgPool) -> Result<Vec<PredictionWithUser>, sqlx::Error> {
    sqlx::query_as::<_, PredictionWithUser>(&format!("{WITH_USER_SELECT} ORDER BY p.created_at DESC"))
        .fetch_all(pool)
        .await
}

pub async fn find_user_prediction(
    pool: &PgPool,
    user_id: Uuid,
    match_id: Uuid,
) -> Result<Option<Prediction>, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(&format!(
        "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE user_id = $1 AND match_id = $2"
    ))
    .bind(user_id)
    .bind(match_id)
    .fetch_optional(pool)
    .await
}

pub async fn predicted_scores_for_match(pool: &PgPool, match_id: Uuid) -> Result<Vec<PredictedScore>, sqlx::Error> {
    let predictions = sqlx::query_as::<_, Prediction>(&format!(
        "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE match_id = $1"
    ))
    .bind(match_id)
    .fetch_all(pool)
    .await?;

    Ok(predictions.iter().map(Prediction::predicted_score).collect())
}

/// Predictions to score, locked against concurrent edits for the transaction
pub async fn predictions_to_score(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
) -> Result<Vec<Prediction>, sqlx::Error> {
    sqlx::query_as::<_, Prediction>(&format!(
        "SELECT {PREDICTION_COLUMNS} FROM predictions WHERE match_id = $1 ORDER BY created_at FOR UPDATE"
    ))
    .bind(match_id)
    .fetch_all(&mut **tx)
    .await
}
