use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::common::ApiResponse;
use crate::scoring::ScoringEngine;

#[derive(Serialize)]
pub struct ResetResponse {
    pub cleared_user_scores: u64,
}

// POST /admin/scores/reset
pub async fn reset_scores(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let engine = ScoringEngine::new(pool.get_ref().clone());
    let cleared_user_scores = engine.reset_all().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "All scores reset",
        ResetResponse { cleared_user_scores },
    )))
}

// POST /admin/scores/recalculate
pub async fn recalculate_scores(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let engine = ScoringEngine::new(pool.get_ref().clone());
    let summary = engine.recalculate_all().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Scores recalculated", summary)))
}
