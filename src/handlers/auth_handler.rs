// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::jwt::{expired_session_cookie, generate_token, session_cookie};
use crate::config::jwt::JwtSettings;
use crate::db::helpers::require_record;
use crate::db::users::{find_credentials, find_user_by_id, record_sign_in};
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::common::ApiResponse;
use crate::utils::password::verify_password;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[tracing::instrument(
    name = "Login user attempt",
    skip(login_form, pool, jwt_settings),
    fields(
        username = %login_form.username
    )
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>
) -> Result<HttpResponse, AppError> {
    let credentials = match find_credentials(&pool, login_form.username.trim()).await? {
        Some(credentials) => credentials,
        None => {
            tracing::info!("User not found or invalid credentials");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    if !verify_password(login_form.password.expose_secret(), &credentials.password_hash) {
        tracing::info!("Invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let user = record_sign_in(&pool, credentials.id).await?;
    let token = generate_token(&user, &jwt_settings)?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&token, &jwt_settings))
        .json(LoginResponse { token, user }))
}

pub async fn logout_user(jwt_settings: web::Data<JwtSettings>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(expired_session_cookie(&jwt_settings))
        .json(ApiResponse::<()>::success_message("Logged out"))
}

#[tracing::instrument(name = "Fetching current user", skip(pool, claims), fields(username = %claims.username))]
pub async fn current_user(
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = require_record(find_user_by_id(&pool, user_id).await, "User not found")?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("User retrieved", user)))
}
