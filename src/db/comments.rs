use sqlx::PgPool;
use uuid::Uuid;

use crate::models::comment::{Comment, CommentWithUser};

pub async fn create_comment(
    pool: &PgPool,
    user_id: Uuid,
    match_id: Uuid,
    content: &str,
    parent_id: Option<Uuid>,
) -> Result<Comment, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (id, user_id, match_id, content, parent_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, match_id, parent_id, content, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(match_id)
    .bind(content)
    .bind(parent_id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

pub async fn get_comment_by_id(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, match_id, parent_id, content, created_at, updated_at
        FROM comments
        WHERE id = $1
        "#,
    )
    .bind(comment_id)
    .fetch_optional(pool)
    .await
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Newest first
pub async fn get_match_comments(
    pool: &PgPool,
    match_id: Uuid,
    limit: i64,
) -> Result<Vec<CommentWithUser>, sqlx::Error> {
    sqlx::query_as::<_, CommentWithUser>(
        r#"
        SELECT
            c.id, c.user_id, c.match_id, c.parent_id, c.content, c.created_at, c.updated_at,
            u.username, u.profile_photo
        FROM comments c
        INNER JOIN users u ON u.id = c.user_id
        WHERE c.match_id = $1
        ORDER BY c.created_at DESC, c.id
        LIMIT $2
        "#,
    )
    .bind(match_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
