pub mod jwt;
pub mod minio;
pub mod settings;
