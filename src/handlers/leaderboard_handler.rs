use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::or_empty_when_unavailable;
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::{ApiResponse, LimitQuery};
use crate::models::score::UserScore;
use crate::scoring::leaderboard::{clamp_limit, LeaderboardService};

#[tracing::instrument(name = "Fetching leaderboard", skip(pool, query))]
pub async fn get_leaderboard(
    pool: web::Data<PgPool>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let service = LeaderboardService::new(pool.get_ref().clone());
    let entries = or_empty_when_unavailable(
        service.list(clamp_limit(query.limit)).await.map_err(AppError::from),
        "leaderboard",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard retrieved", entries)))
}

async fn score_or_zero(pool: &PgPool, user_id: Uuid) -> Result<UserScore, AppError> {
    let service = LeaderboardService::new(pool.clone());
    match service.user_score(user_id).await.map_err(AppError::from) {
        Err(e) if e.is_unavailable() => {
            tracing::warn!("Database unavailable, serving zero score: {:?}", e);
            Ok(UserScore::empty(user_id))
        }
        other => other,
    }
}

pub async fn get_user_score(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let score = score_or_zero(&pool, user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Score retrieved", score)))
}

pub async fn get_my_score(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let score = score_or_zero(&pool, claims.user_id()?).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Score retrieved", score)))
}

/// Winner of a gameweek, `null` until something in that week has been scored
#[tracing::instrument(name = "Fetching weekly winner", skip(pool))]
pub async fn get_weekly_winner(
    pool: web::Data<PgPool>,
    week: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let service = LeaderboardService::new(pool.get_ref().clone());
    let winner = or_empty_when_unavailable(
        service.weekly_winner(week.into_inner()).await.map_err(AppError::from),
        "weekly winner",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Weekly winner retrieved", winner)))
}
