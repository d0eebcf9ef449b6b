use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::or_empty_when_unavailable;
use crate::db::predictions::{all_predictions, predictions_for_match};
use crate::errors::AppError;
use crate::models::common::ApiResponse;

// GET /admin/predictions
pub async fn get_all_predictions(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let predictions = or_empty_when_unavailable(
        all_predictions(&pool).await.map_err(AppError::from),
        "predictions",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Predictions retrieved", predictions)))
}

// GET /admin/predictions/match/{id}
pub async fn get_match_predictions(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let predictions = or_empty_when_unavailable(
        predictions_for_match(&pool, match_id.into_inner()).await.map_err(AppError::from),
        "match predictions",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Predictions retrieved", predictions)))
}
