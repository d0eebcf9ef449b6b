use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;

use crate::config::jwt::JwtSettings;
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::user::User;

/// Name of the http-only cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

pub fn generate_token(user: &User, jwt_settings: &JwtSettings) -> Result<String, AppError> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(jwt_settings.expiration_hours))
        .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| {
        AppError::Internal(format!("Error generating JWT token: {:?}", e))
    })
}

pub fn decode_token(token: &str, jwt_settings: &JwtSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}

pub fn session_cookie(token: &str, jwt_settings: &JwtSettings) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .secure(jwt_settings.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(jwt_settings.expiration_hours))
        .finish()
}

/// Cookie that makes the browser drop the session
pub fn expired_session_cookie(jwt_settings: &JwtSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(jwt_settings.cookie_secure)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use uuid::Uuid;

    fn settings() -> JwtSettings {
        JwtSettings::new("test-secret-at-least-32-bytes-long!!".into(), 1, false)
    }

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "gunner".into(),
            name: Some("Gunner".into()),
            role,
            profile_photo: None,
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        }
    }

    #[test]
    fn token_carries_identity_and_role() {
        let user = user(UserRole::Admin);
        let token = generate_token(&user, &settings()).unwrap();
        let claims = decode_token(&token, &settings()).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.username, "gunner");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = generate_token(&user(UserRole::User), &settings()).unwrap();
        let other = JwtSettings::new("a-completely-different-secret-value".into(), 1, false);
        assert!(decode_token(&token, &other).is_err());
    }

    #[test]
    fn session_cookie_is_http_only() {
        let cookie = session_cookie("abc", &settings());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = expired_session_cookie(&settings());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
