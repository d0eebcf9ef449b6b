use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

pub const COMMENT_MAX_LEN: usize = 1000;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub match_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CommentWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub comment: Comment,
    pub username: String,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub match_id: Uuid,
    pub content: String,
    pub parent_id: Option<Uuid>,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.content.trim().is_empty() {
            return Err(AppError::validation("Comment content cannot be empty"));
        }
        if self.content.chars().count() > COMMENT_MAX_LEN {
            return Err(AppError::validation(format!(
                "Comment content too long (max {} characters)",
                COMMENT_MAX_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentQueryParams {
    pub limit: Option<i64>,
}

impl CommentQueryParams {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }
}
