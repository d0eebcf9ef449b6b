use std::net::TcpListener;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use predictor_backend::run;
use predictor_backend::config::settings::{get_config, get_jwt_settings};
use predictor_backend::services::MinIOService;
use predictor_backend::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = get_config().map_err(|e| {
        eprintln!("Failed to read the config: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let subscriber = get_subscriber(
        "predictor-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    // JWT
    let jwt_settings = get_jwt_settings(&config);

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(16)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(config.database.connection_string().expose_secret())
        .map_err(|e| {
            tracing::error!("Invalid Postgres connection settings: {}", e);
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
        })?;

    match sqlx::migrate!("./migrations").run(&connection_pool).await {
        Ok(_) => tracing::info!("✅ Database migrations applied"),
        Err(e) => tracing::warn!("⚠️ Could not run migrations, serving degraded: {}", e),
    }

    // Storage
    let minio_service = MinIOService::new(config.minio.clone());
    minio_service.ensure_bucket().await;

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("🚀 Listening on {}", address);

    run(
        listener,
        connection_pool,
        jwt_settings,
        minio_service
    )?.await
}
