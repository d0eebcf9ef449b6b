use std::fmt;
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::AppError;
use crate::models::common::UnknownVariant;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            other => Err(UnknownVariant { kind: "role", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Public view of an account; the password hash never leaves the db layer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub password_hash: String,
}

#[derive(Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    #[serde(serialize_with = "serialize_secret_string", deserialize_with = "deserialize_secret_string")]
    pub password: SecretString,
    pub name: Option<String>,
}

impl RegistrationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let username_len = self.username.trim().chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
            return Err(AppError::validation(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            )));
        }
        if self.password.expose_secret().chars().count() < PASSWORD_MIN_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN_LEN
            )));
        }
        Ok(())
    }

    /// Display name, falling back to the username like the sign-up form does
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.username.trim().to_string(),
        }
    }
}

impl std::fmt::Display for RegistrationRequest{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username: {}", self.username)
    }
}

/// Row of the admin user list, carrying the user's aggregate score
#[derive(Debug, Serialize, FromRow)]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
    pub total_points: i32,
    pub total_predictions: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

pub fn serialize_secret_string<S>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("[REDACTED]")
}

pub fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(SecretString::new(s.into_boxed_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str, name: Option<&str>) -> RegistrationRequest {
        RegistrationRequest {
            username: username.to_string(),
            password: SecretString::new(password.into()),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn registration_enforces_username_and_password_bounds() {
        assert!(request("abc", "secret", None).validate().is_ok());
        assert!(request("ab", "secret", None).validate().is_err());
        assert!(request(&"x".repeat(51), "secret", None).validate().is_err());
        assert!(request("valid_user", "12345", None).validate().is_err());
    }

    #[test]
    fn display_name_defaults_to_username() {
        assert_eq!(request("striker", "secret", None).display_name(), "striker");
        assert_eq!(request("striker", "secret", Some("  ")).display_name(), "striker");
        assert_eq!(request("striker", "secret", Some("Alan")).display_name(), "Alan");
    }

    #[test]
    fn roles_parse_from_their_labels() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(UserRole::try_from("user".to_string()).unwrap(), UserRole::User);
        assert!("owner".parse::<UserRole>().is_err());
    }
}
