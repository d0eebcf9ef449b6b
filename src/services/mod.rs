pub mod minio_service;

pub use minio_service::MinIOService;
