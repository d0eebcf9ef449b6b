use crate::config::minio::MinIOSettings;
use bytes::Bytes;
use aws_sdk_s3::{Client as S3Client, primitives::ByteStream};
use rand::RngCore;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PROFILE_PHOTO_PREFIX: &str = "profile-photos";
pub const DEFAULT_PHOTO_EXTENSION: &str = "jpg";

#[derive(Clone, Debug)]
pub struct MinIOService {
    client: Arc<S3Client>,
    settings: MinIOSettings,
}

impl MinIOService {
    /// Build the client. No request is sent until the first upload.
    pub fn new(settings: MinIOSettings) -> Self {
        let client = Arc::new(settings.create_s3_client());
        Self { client, settings }
    }

    pub fn bucket_name(&self) -> &str {
        &self.settings.bucket_name
    }

    /// Create the bucket if it is missing. Storage being down must not keep the
    /// API from starting, so failures are only logged.
    pub async fn ensure_bucket(&self) {
        let bucket = self.bucket_name();
        info!("🗄️ Initializing MinIO bucket: {}", bucket);

        if self.client.head_bucket().bucket(bucket).send().await.is_ok() {
            info!("✅ MinIO bucket already exists");
            return;
        }

        info!("📦 Creating MinIO bucket: {}", bucket);
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => info!("✅ MinIO bucket created successfully"),
            Err(e) => warn!("⚠️ Could not create MinIO bucket {}: {}", bucket, e),
        }
    }

    /// Store a profile photo under a fresh key and return that key
    pub async fn upload_profile_photo(
        &self,
        file_data: Bytes,
        extension: Option<&str>,
        content_type: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let object_key = profile_photo_key(
            chrono::Utc::now().timestamp_millis(),
            &random_suffix(),
            extension,
        );

        info!("📤 Uploading file to MinIO: {} (size: {} bytes)", object_key, file_data.len());

        match self.client
            .put_object()
            .bucket(self.bucket_name())
            .key(&object_key)
            .body(ByteStream::from(file_data))
            .content_type(content_type)
            .metadata("uploaded_at", chrono::Utc::now().to_rfc3339())
            .send()
            .await
        {
            Ok(_) => {
                info!("✅ File uploaded successfully to MinIO: {}", object_key);
                Ok(object_key)
            }
            Err(e) => {
                error!("❌ Failed to upload file to MinIO: {}", e);
                Err(Box::new(e))
            }
        }
    }

    pub fn object_url(&self, object_key: &str) -> String {
        self.settings.object_url(object_key)
    }
}

fn random_suffix() -> String {
    let mut buf = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// `profile-photos/{millis}-{suffix}.{ext}`, falling back to jpg when the
/// upload carried no usable extension.
pub fn profile_photo_key(millis: i64, suffix: &str, extension: Option<&str>) -> String {
    let extension = extension
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_PHOTO_EXTENSION.to_string());

    format!("{}/{}-{}.{}", PROFILE_PHOTO_PREFIX, millis, suffix, extension)
}
