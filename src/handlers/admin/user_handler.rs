use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::helpers::{or_empty_when_unavailable, require_record};
use crate::db::users::{delete_user as delete_user_row, list_users_with_scores, set_role};
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::{UpdateRoleRequest, UserRole};

// GET /admin/users - List users with their aggregate score
pub async fn get_users(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let users = or_empty_when_unavailable(
        list_users_with_scores(&pool).await.map_err(AppError::from),
        "user list",
    )?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Users retrieved", users)))
}

// DELETE /admin/users/{id}
#[tracing::instrument(name = "Deleting user", skip(pool, claims), fields(admin = %claims.username))]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = user_id.into_inner();
    if user_id == claims.user_id()? {
        return Err(AppError::validation("You cannot delete your own account"));
    }

    if !delete_user_row(&pool, user_id).await? {
        return Err(AppError::not_found("User not found"));
    }

    tracing::info!("User {} deleted", user_id);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("User deleted")))
}

// PATCH /admin/users/{id}/role
#[tracing::instrument(name = "Updating user role", skip(pool, body, claims), fields(admin = %claims.username, role = %body.role))]
pub async fn update_user_role(
    pool: web::Data<PgPool>,
    user_id: web::Path<Uuid>,
    body: web::Json<UpdateRoleRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = user_id.into_inner();
    let role: UserRole = body
        .role
        .parse()
        .map_err(|_| AppError::validation("Role must be one of user, admin"))?;

    if user_id == claims.user_id()? && role != UserRole::Admin {
        return Err(AppError::validation("You cannot revoke your own admin role"));
    }

    let user = require_record(set_role(&pool, user_id, role).await, "User not found")?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Role updated", user)))
}
