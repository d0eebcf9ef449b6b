use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::comments::get_match_comments;
use crate::db::helpers::{or_empty_when_unavailable, require_record};
use crate::db::matches::{find_match, list_matches, list_matches_by_week, team_stats_for_match};
use crate::db::predictions::predicted_scores_for_match;
use crate::errors::AppError;
use crate::models::comment::CommentQueryParams;
use crate::models::common::ApiResponse;
use crate::models::matches::{MatchDetail, MatchListing, MatchWithFormRow};
use crate::scoring::stats::PredictionStats;
use crate::scoring::window::prediction_deadline;

fn to_listings(rows: Vec<MatchWithFormRow>) -> Vec<MatchListing> {
    let now = Utc::now();
    rows.into_iter()
        .map(|row| MatchListing::from_row(row, now))
        .collect()
}

#[tracing::instrument(name = "Listing matches", skip(pool))]
pub async fn get_matches(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let rows = or_empty_when_unavailable(
        list_matches(&pool).await.map_err(AppError::from),
        "match list",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved", to_listings(rows))))
}

#[tracing::instrument(name = "Listing matches of a week", skip(pool))]
pub async fn get_matches_by_week(
    pool: web::Data<PgPool>,
    week: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let rows = or_empty_when_unavailable(
        list_matches_by_week(&pool, week.into_inner()).await.map_err(AppError::from),
        "week fixtures",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved", to_listings(rows))))
}

#[tracing::instrument(name = "Fetching match", skip(pool))]
pub async fn get_match(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let match_id = match_id.into_inner();
    let fixture = require_record(find_match(&pool, match_id).await, "Match not found")?;
    let stats = team_stats_for_match(&pool, match_id).await?;

    let detail = MatchDetail {
        prediction_deadline: prediction_deadline(fixture.match_date),
        predictions_open: fixture.accepts_predictions(Utc::now()),
        fixture,
        stats,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success("Match retrieved", detail)))
}

#[tracing::instrument(name = "Computing prediction stats", skip(pool))]
pub async fn get_prediction_stats(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let predictions = or_empty_when_unavailable(
        predicted_scores_for_match(&pool, match_id.into_inner()).await.map_err(AppError::from),
        "prediction stats",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Prediction stats retrieved",
        PredictionStats::from_predictions(&predictions),
    )))
}

#[tracing::instrument(name = "Listing match comments", skip(pool, query))]
pub async fn get_comments(
    pool: web::Data<PgPool>,
    match_id: web::Path<Uuid>,
    query: web::Query<CommentQueryParams>,
) -> Result<HttpResponse, AppError> {
    let comments = or_empty_when_unavailable(
        get_match_comments(&pool, match_id.into_inner(), query.limit())
            .await
            .map_err(AppError::from),
        "comments",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Comments retrieved", comments)))
}
