use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::require_record;
use crate::db::matches::{
    carry_team_stats, delete_match as delete_match_row, find_match_for_update, insert_match,
    update_match as update_match_row, upsert_team_forms,
};
use crate::errors::AppError;
use crate::models::common::ApiResponse;
use crate::models::matches::{CreateMatchRequest, Match, UpdateMatchRequest};
use crate::models::score::ScoringSummary;
use crate::scoring::ScoringEngine;

#[derive(Serialize)]
pub struct MatchUpdateResponse {
    #[serde(rename = "match")]
    pub fixture: Match,
    pub scoring: ScoringSummary,
}

// POST /admin/matches
#[tracing::instrument(
    name = "Creating match",
    skip(pool, body),
    fields(home = %body.home_team, away = %body.away_team, week = body.week)
)]
pub async fn create_match(
    pool: web::Data<PgPool>,
    body: web::Json<CreateMatchRequest>,
) -> Result<HttpResponse, AppError> {
    let forms = body.validate()?;

    let mut tx = pool.begin().await?;
    let fixture = insert_match(&mut tx, &body).await?;
    upsert_team_forms(&mut tx, &fixture, &forms).await?;
    tx.commit().await?;

    tracing::info!("Match {} created", fixture.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Match created", fixture)))
}

// PATCH /admin/matches/{id}
#[tracing::instrument(name = "Updating match", skip(pool, body))]
pub async fn update_match(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
    body: web::Json<UpdateMatchRequest>,
) -> Result<HttpResponse, AppError> {
    let match_id = match_id.into_inner();
    let mut tx = pool.begin().await?;

    let current = require_record(find_match_for_update(&mut tx, match_id).await, "Match not found")?;
    let (changes, forms) = body.apply(&current)?;

    let fixture = update_match_row(&mut tx, match_id, &changes).await?;
    carry_team_stats(&mut tx, &current, &fixture).await?;
    upsert_team_forms(&mut tx, &fixture, &forms).await?;

    let scoring = ScoringEngine::sync_match_in_tx(&mut tx, &fixture).await?;
    tx.commit().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Match updated",
        MatchUpdateResponse { fixture, scoring },
    )))
}

// DELETE /admin/matches/{id}
#[tracing::instrument(name = "Deleting match", skip(pool))]
pub async fn delete_match(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let match_id = match_id.into_inner();
    let mut tx = pool.begin().await?;

    let affected = ScoringEngine::clear_match_in_tx(&mut tx, match_id).await?;
    if !delete_match_row(&mut tx, match_id).await? {
        return Err(AppError::not_found("Match not found"));
    }
    ScoringEngine::refresh_user_scores_in_tx(&mut tx, &affected).await?;
    tx.commit().await?;

    tracing::info!("Match {} deleted, {} user scores refreshed", match_id, affected.len());
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match deleted")))
}
