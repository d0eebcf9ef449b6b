use actix_multipart::form::{tempfile::TempFile, MultipartForm, MultipartFormConfig};
use actix_multipart::MultipartError;
use actix_web::error::PayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use bytes::Bytes;
use serde::Serialize;
use sqlx::PgPool;
use std::path::Path;

use crate::db::helpers::require_record;
use crate::db::users::set_profile_photo;
use crate::errors::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::services::MinIOService;

pub const MAX_PROFILE_PHOTO_SIZE: usize = 5 * 1024 * 1024; // 5MiB

#[derive(Debug, MultipartForm)]
pub struct ProfilePhotoForm {
    #[multipart(limit = "5MiB")]
    pub file: TempFile,
}

fn size_exceeded_message() -> String {
    format!(
        "File size exceeds maximum limit of {}MB",
        MAX_PROFILE_PHOTO_SIZE / 1024 / 1024
    )
}

/// Multipart rejections raised before the handler runs, in the API error envelope
pub fn multipart_error(err: MultipartError) -> AppError {
    match err {
        MultipartError::Payload(PayloadError::Overflow) => AppError::validation(size_exceeded_message()),
        other => AppError::validation(format!("Invalid upload: {}", other)),
    }
}

pub fn profile_photo_form_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .error_handler(|err, _req: &HttpRequest| multipart_error(err).into())
}

#[derive(Serialize)]
pub struct ProfilePhotoResponse {
    pub url: String,
}

/// Size and mime checks shared by every photo upload
pub fn check_photo(size: usize, content_type: Option<&str>) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::validation("File is empty"));
    }
    if size > MAX_PROFILE_PHOTO_SIZE {
        return Err(AppError::validation(size_exceeded_message()));
    }
    match content_type {
        Some(mime) if mime.starts_with("image/") => Ok(()),
        _ => Err(AppError::validation("Only image uploads are allowed")),
    }
}

fn photo_extension(file_name: Option<&str>) -> Option<String> {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_string)
}

// POST /me/profile-photo
#[tracing::instrument(
    name = "Uploading profile photo",
    skip(form, claims, pool, minio_service),
    fields(
        username = %claims.username,
        file_name = %form.file.file_name.as_deref().unwrap_or("unknown")
    )
)]
pub async fn upload_profile_photo(
    MultipartForm(form): MultipartForm<ProfilePhotoForm>,
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
    minio_service: web::Data<MinIOService>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    let content_type = form.file.content_type.as_ref().map(|mime| mime.to_string());
    check_photo(form.file.size, content_type.as_deref())?;

    let path = form.file.file.path().to_path_buf();
    let data = web::block(move || std::fs::read(path))
        .await
        .map_err(|e| AppError::Internal(format!("Upload read task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to read uploaded file: {}", e)))?;

    let extension = photo_extension(form.file.file_name.as_deref());
    let object_key = minio_service
        .upload_profile_photo(
            Bytes::from(data),
            extension.as_deref(),
            content_type.as_deref().unwrap_or("application/octet-stream"),
        )
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    let url = minio_service.object_url(&object_key);
    require_record(set_profile_photo(&pool, user_id, &url).await, "User not found")?;

    tracing::info!("✅ Profile photo of user {} stored at {}", user_id, object_key);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profile photo uploaded",
        ProfilePhotoResponse { url },
    )))
}
