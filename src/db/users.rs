use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{AdminUserSummary, User, UserCredentials, UserRole};

const USER_COLUMNS: &str =
    "id, username, name, role, profile_photo, created_at, updated_at, last_signed_in";

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    name: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, password_hash, name, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(password_hash)
    .bind(name)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_credentials(pool: &PgPool, username: &str) -> Result<Option<UserCredentials>, sqlx::Error> {
    sqlx::query_as::<_, UserCredentials>(
        "SELECT id, password_hash FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Stamp a successful login and return the fresh record
pub async fn record_sign_in(pool: &PgPool, user_id: Uuid) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET last_signed_in = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn set_profile_photo(pool: &PgPool, user_id: Uuid, url: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET profile_photo = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(url)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn set_role(pool: &PgPool, user_id: Uuid, role: UserRole) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(role.as_str())
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Set a new password hash and the admin role for `username`
pub async fn promote_with_password(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users SET role = 'admin', password_hash = $1, updated_at = NOW()
        WHERE username = $2
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(password_hash)
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn list_users_with_scores(pool: &PgPool) -> Result<Vec<AdminUserSummary>, sqlx::Error> {
    sqlx::query_as::<_, AdminUserSummary>(
        r#"
        SELECT
            u.id,
            u.username,
            u.name,
            u.role,
            u.profile_photo,
            u.created_at,
            u.last_signed_in,
            COALESCE(us.total_points, 0) AS total_points,
            COALESCE(us.total_predictions, 0) AS total_predictions
        FROM users u
        LEFT JOIN user_scores us ON us.user_id = u.id
        ORDER BY u.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Predictions, comments and scores of the user go with it (FK cascade)
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
