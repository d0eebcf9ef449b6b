use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::comments::{create_comment, delete_comment, get_comment_by_id},
    db::helpers::require_record,
    db::matches::find_match,
    errors::AppError,
    middleware::auth::Claims,
    models::comment::CreateCommentRequest,
    models::common::ApiResponse,
};

#[tracing::instrument(
    name = "Adding comment",
    skip(pool, body, claims),
    fields(username = %claims.username, match_id = %body.match_id)
)]
pub async fn add_comment(
    pool: web::Data<PgPool>,
    body: web::Json<CreateCommentRequest>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    body.validate()?;

    require_record(find_match(&pool, body.match_id).await, "Match not found")?;

    if let Some(parent_id) = body.parent_id {
        let parent = require_record(get_comment_by_id(&pool, parent_id).await, "Parent comment not found")?;
        if parent.match_id != body.match_id {
            return Err(AppError::validation("Parent comment belongs to another match"));
        }
    }

    let comment = create_comment(&pool, user_id, body.match_id, body.content.trim(), body.parent_id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success("Comment added", comment)))
}

/// Authors may delete their own comments, admins any
#[tracing::instrument(name = "Removing comment", skip(pool, claims), fields(username = %claims.username))]
pub async fn remove_comment(
    pool: web::Data<PgPool>,
    comment_id: web::Path<Uuid>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let comment_id = comment_id.into_inner();

    let comment = require_record(get_comment_by_id(&pool, comment_id).await, "Comment not found")?;
    if comment.user_id != user_id && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "You can only delete your own comments".to_string(),
        ));
    }

    if !delete_comment(&pool, comment_id).await? {
        return Err(AppError::not_found("Comment not found"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Comment deleted")))
}
