//! Application error taxonomy and its HTTP mapping.
//!
//! Handlers return `Result<HttpResponse, AppError>`; actix turns the error
//! side into the shared [`ApiResponse`] error envelope.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::models::common::ApiResponse;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service temporarily unavailable")]
    Unavailable(#[source] sqlx::Error),

    #[error("Database error")]
    Database(#[source] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Unavailable(error)
            }
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_error) => match db_error.code().as_deref() {
                Some(UNIQUE_VIOLATION) => AppError::Conflict("Record already exists".to_string()),
                Some(FOREIGN_KEY_VIOLATION) => {
                    AppError::NotFound("Referenced record not found".to_string())
                }
                _ => AppError::Database(error),
            },
            _ => AppError::Database(error),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unavailable(e) => tracing::error!("Database unavailable: {:?}", e),
            AppError::Database(e) => tracing::error!("Database error occurred: {:?}", e),
            AppError::Storage(e) => tracing::error!("Storage error occurred: {}", e),
            AppError::Internal(e) => tracing::error!("Internal error occurred: {}", e),
            other => tracing::info!("Request rejected: {}", other),
        }

        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_map_to_unavailable() {
        let error = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_unavailable());
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(AppError::from(sqlx::Error::Io(io)).is_unavailable());
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("no".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("no".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("gone").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("dup".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::Storage("s3".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::Internal("bcrypt".into()).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_details_stay_out_of_the_message() {
        assert_eq!(AppError::Internal("bcrypt cost".into()).to_string(), "Internal server error");
    }

    #[test]
    fn validation_message_is_user_visible() {
        assert_eq!(AppError::validation("Scores must be non-negative").to_string(), "Scores must be non-negative");
    }
}
