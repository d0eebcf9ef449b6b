use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::{or_empty_when_unavailable, require_record};
use crate::db::matches::find_match;
use crate::db::predictions::{find_user_prediction, predictions_for_user, upsert_prediction};
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::prediction::SubmitPredictionRequest;

/// Create or overwrite the caller's prediction while the window is open
#[tracing::instrument(
    name = "Submitting prediction",
    skip(pool, body, claims),
    fields(username = %claims.username, match_id = %body.match_id)
)]
pub async fn submit_prediction(
    pool: web::Data<PgPool>,
    body: web::Json<SubmitPredictionRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let predicted = body.validate()?;

    let fixture = require_record(find_match(&pool, body.match_id).await, "Match not found")?;
    if !fixture.accepts_predictions(Utc::now()) {
        return Err(AppError::validation("Predictions are closed for this match"));
    }

    let prediction = upsert_prediction(&pool, user_id, fixture.id, &predicted)
        .await?
        .ok_or_else(|| AppError::validation("Predictions are closed for this match"))?;
    tracing::info!(
        "Prediction {}-{} ({}) saved",
        prediction.predicted_home_score,
        prediction.predicted_away_score,
        prediction.predicted_result
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success("Prediction saved", prediction)))
}

pub async fn get_my_predictions(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let predictions = or_empty_when_unavailable(
        predictions_for_user(&pool, user_id).await.map_err(AppError::from),
        "own predictions",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Predictions retrieved", predictions)))
}

/// The caller's prediction for one match, or `null` when there is none
pub async fn get_my_prediction_for_match(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let prediction = or_empty_when_unavailable(
        find_user_prediction(&pool, user_id, match_id.into_inner())
            .await
            .map_err(AppError::from),
        "own prediction",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Prediction retrieved", prediction)))
}

pub async fn get_user_predictions(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let predictions = or_empty_when_unavailable(
        predictions_for_user(&pool, user_id.into_inner()).await.map_err(AppError::from),
        "user predictions",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Predictions retrieved", predictions)))
}
