use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::jwt::{generate_token, session_cookie};
use crate::config::jwt::JwtSettings;
use crate::db::users::insert_user;
use crate::errors::AppError;
use crate::models::auth::LoginResponse;
use crate::models::user::{RegistrationRequest, UserRole};
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool, jwt_settings),
    fields(
        username = %user_form.username
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    user_form.validate()?;

    let password_hash = hash_password(user_form.password.expose_secret())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = insert_user(
        &pool,
        user_form.username.trim(),
        &password_hash,
        &user_form.display_name(),
        UserRole::User,
    )
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict("Username is already taken".to_string()),
        other => other,
    })?;

    tracing::info!("User {} registered", user.id);

    let token = generate_token(&user, &jwt_settings)?;
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, &jwt_settings))
        .json(LoginResponse { token, user }))
}
